//! Worker lifecycle phases and client messages.

use serde::Deserialize;

/// Lifecycle phase of the cache worker.
///
/// Transitions are driven by the embedder, which dispatches the install and
/// activate events; the worker itself only moves a phase forward when told
/// to skip waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Install event dispatched, pre-population in progress.
    Installing,
    /// Installed, waiting to activate.
    Installed,
    /// Activate event dispatched, stale stores being cleared.
    Activating,
    /// Active and answering fetch events.
    Active,
}

impl std::fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerPhase::Installing => write!(f, "installing"),
            WorkerPhase::Installed => write!(f, "installed"),
            WorkerPhase::Activating => write!(f, "activating"),
            WorkerPhase::Active => write!(f, "active"),
        }
    }
}

/// Structured message from a client page. Only one message type is
/// recognized; everything else is ignored by the message handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}
