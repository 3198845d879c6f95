//! Error Taxonomy
//!
//! Typed outcomes for every stage of the backup pass. Stages never panic and
//! never terminate the process; the scheduler is the single point that
//! decides pass-abort versus continue. Only configuration errors (see
//! `config::ConfigError`) are fatal to the daemon, and only at startup.

use thiserror::Error;

/// Failure while asking the router for the read-replica destinations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("discovery request failed: {0}")]
    Transport(String),
    /// Non-200 answers carry the HTTP status and the raw body; operators
    /// diagnose router misconfiguration from exactly this text.
    #[error("discovery endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },
    #[error("discovery response could not be decoded: {0}")]
    Decode(String),
}

/// Outcome classification for one dump attempt.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The tool could not reach the database server. The caller fails over
    /// to the next candidate node.
    #[error("cannot connect to {node}: {output}")]
    ConnectionRefused { node: String, output: String },
    /// Any other tool failure. The raw combined output is the payload and
    /// the pass aborts without retry.
    #[error("dump tool failed:\n{output}")]
    Failed { output: String },
    /// The script could not be written or the tool could not be spawned.
    #[error("dump tool could not be run: {0}")]
    Io(#[from] std::io::Error),
}

/// Object-storage operation failure, store-agnostic.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObjectStoreError(pub String);

/// Alert delivery failure. Delivery is best-effort; this is logged by the
/// scheduler and never aborts a pass.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AlertError(pub String);

/// Terminal error of a single pipeline pass. Reported and alerted; the
/// daemon returns to idle and waits for the next tick.
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// The discovered list was empty, or every node refused the connection.
    #[error("all cluster nodes are unavailable ({attempts} tried)")]
    AllNodesUnavailable { attempts: usize },
    #[error("dump failed on {node}:\n{output}")]
    DumpFatal { node: String, output: String },
    /// The dump tool could not be spawned or its script could not be
    /// written. Distinct from [`PassError::Workspace`] so a missing binary
    /// reads as a tool problem, not a filesystem one.
    #[error("dump tool could not be run: {0}")]
    DumpTool(#[source] std::io::Error),
    #[error("dump workspace error: {0}")]
    Workspace(#[source] std::io::Error),
    #[error("archive compression failed: {0}")]
    Compression(#[source] std::io::Error),
    #[error("local prune failed: {0}")]
    PruneLocal(#[source] std::io::Error),
    #[error("upload failed: {0}")]
    Upload(#[source] ObjectStoreError),
    #[error("remote prune failed: {0}")]
    PruneRemote(#[source] ObjectStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_error_surfaces_status_and_body() {
        let err = DiscoveryError::Endpoint {
            status: 404,
            body: "route not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("route not found"));
    }

    #[test]
    fn test_dump_fatal_carries_raw_output() {
        let err = PassError::DumpFatal {
            node: "db-1:3306".to_string(),
            output: "ERROR 1045 (28000): Access denied".to_string(),
        };
        assert!(err.to_string().contains("Access denied"));
    }

    #[test]
    fn test_all_nodes_unavailable_reports_attempts() {
        let err = PassError::AllNodesUnavailable { attempts: 3 };
        assert!(err.to_string().contains("3 tried"));
    }
}
