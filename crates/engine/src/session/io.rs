use std::io;

use async_trait::async_trait;

/// Line-oriented read side of a player connection.
///
/// Implemented by the protocol layer (telnet negotiation, buffering)
/// outside this crate. One reader feeds exactly one session.
#[async_trait]
pub trait LineReader: Send {
    /// Reads the next completed line, without its terminator.
    ///
    /// Returns `Ok(None)` when the connection closed cleanly.
    async fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Write side of the player's terminal.
pub trait Terminal: Send {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Erases the partially typed input line, so an asynchronous message
    /// does not corrupt it visually.
    fn clear_line(&mut self) -> io::Result<()>;

    /// Writes the prompt without a trailing newline.
    fn write_prompt(&mut self, prompt: &str) -> io::Result<()>;
}
