//! Node Discovery Port
//!
//! Defines the interface for discovering live read-replica destinations.

use crate::domain::entities::Node;
use crate::domain::errors::DiscoveryError;
use async_trait::async_trait;

/// Source of the current read-replica destinations.
///
/// This is an outbound port that abstracts the router's discovery endpoint.
/// Fetching is an idempotent read with no side effects beyond refreshing the
/// caller's view; the pipeline calls it fresh at the start of every pass and
/// never caches the result across runs.
#[async_trait]
pub trait NodeDiscovery: Send + Sync {
    /// Fetch the ordered list of destinations for the read-only route.
    ///
    /// An empty list is a valid, non-erroring answer that simply yields no
    /// usable node. Transport failures, non-200 responses and undecodable
    /// bodies are [`DiscoveryError`]s.
    async fn fetch_nodes(&self) -> Result<Vec<Node>, DiscoveryError>;
}
