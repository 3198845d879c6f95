//! replivault Library
//!
//! This module exposes the replivault components for use in integration tests
//! and as a library.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{BackupPipeline, PassReport, RemoteSync, Scheduler};
pub use config::Config;
pub use domain::entities::{BackupArchive, Node, RemoteObject};
pub use domain::ports::{Alerter, DumpRunner, NodeDiscovery, ObjectStore};
pub use domain::services::{NodeSelector, RetentionPolicy};
pub use infrastructure::{shutdown_signal, ArchiveStore, ShutdownController};
