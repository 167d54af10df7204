//! Error types surfaced by the engine API.
//!
//! Actor-internal faults never propagate back to broadcasters; these enums
//! only cover channel lifecycle failures and session teardown causes.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("event bus command channel closed")]
    BusClosed,

    #[error("combat resolver command channel closed")]
    CombatClosed,

    #[error("actor reply channel closed")]
    ReplyClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

/// Why a session ended abnormally.
///
/// Normal logout (empty input, `quit`, `logout`, clean disconnect) is the
/// `Ok` path of [`Session::run`](crate::session::Session::run).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection i/o failure")]
    Io(#[from] std::io::Error),

    /// The bus closed our event channel: either it was shut down or it
    /// dropped this listener for backpressure.
    #[error("event stream closed by the bus")]
    EventStreamClosed,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
