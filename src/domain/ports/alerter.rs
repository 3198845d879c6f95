//! Alerter Port
//!
//! Defines the interface for delivering run-outcome notifications.

use crate::domain::errors::AlertError;
use async_trait::async_trait;

/// Delivery channel for pass outcomes.
///
/// Delivery is best-effort: the scheduler logs a failed delivery and moves
/// on, it never escalates to a pipeline failure. The scheduler is the only
/// component allowed to call this port.
#[async_trait]
pub trait Alerter: Send + Sync {
    /// Send a text notification, optionally with a rich-text formatting
    /// mode understood by the concrete channel.
    async fn notify(&self, message: &str, parse_mode: Option<&str>) -> Result<(), AlertError>;
}
