use std::io;

use async_trait::async_trait;

use mud_model::{CharRef, Id};

use super::io::Terminal;

/// What the session loop should do after a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    Quit,
}

/// Session state exposed to the command layer during dispatch.
pub struct SessionContext<'a> {
    pub character: &'a CharRef,
    pub terminal: &'a mut dyn Terminal,
    /// Who last sent us a tell, for `reply`-style commands.
    pub reply_to: Option<Id>,
}

/// Seam for the game-command layer.
///
/// The session hands over every completed input line that is not a bare
/// logout; the dispatcher parses and executes it synchronously (relative to
/// the session loop), writing feedback through the terminal.
#[async_trait]
pub trait CommandDispatcher: Send {
    async fn dispatch(
        &mut self,
        ctx: &mut SessionContext<'_>,
        line: &str,
    ) -> io::Result<Dispatch>;
}
