//! Application Layer
//!
//! Use cases that orchestrate the domain through its ports.

mod pipeline;
mod remote_sync;
mod scheduler;

pub use pipeline::{BackupPipeline, PassReport};
pub use remote_sync::RemoteSync;
pub use scheduler::Scheduler;
