pub mod refresh_service;
pub mod scheduler;

pub use refresh_service::{RefreshOutcome, RefreshService};
pub use scheduler::RefreshScheduler;
