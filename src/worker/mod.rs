//! Offline cache worker: lifecycle handlers and client messages.
//!
//! `OfflineCacheManager` is the single decision-making component. The
//! embedder plays host runtime: it dispatches install, activate, fetch and
//! message events; the manager decides what each one does to the stores.

pub mod lifecycle;
pub mod manager;

pub use lifecycle::{ClientMessage, WorkerPhase};
pub use manager::OfflineCacheManager;
