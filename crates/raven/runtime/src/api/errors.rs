//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and world administration so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use raven_core::WorldError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a world or an arena layout before building")]
    MissingWorld,

    #[error(transparent)]
    World(#[from] WorldError),
}
