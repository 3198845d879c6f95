//! Infrastructure Layer
//!
//! Local filesystem concerns and process lifecycle.

pub mod archive;
pub mod shutdown;

pub use archive::ArchiveStore;
pub use shutdown::{shutdown_signal, ShutdownController};
