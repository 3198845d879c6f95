//! Dump Runner Port
//!
//! Defines the interface for the external database dump tool.

use crate::domain::entities::Node;
use crate::domain::errors::DumpError;
use async_trait::async_trait;

/// Executor for the external dump tool.
///
/// Implementations run one dump attempt against one node and classify the
/// outcome: [`DumpError::ConnectionRefused`] asks the caller to fail over to
/// the next candidate; anything else is fatal for the pass. Each attempt
/// must use a fresh output capture, never retaining partial output from a
/// previous attempt.
#[async_trait]
pub trait DumpRunner: Send + Sync {
    async fn dump(&self, node: &Node) -> Result<(), DumpError>;
}
