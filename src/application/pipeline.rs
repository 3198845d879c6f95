//! Backup Pipeline - Main application use case
//!
//! One pass of the backup sequence: clear the dump workspace, dump from a
//! freshly discovered replica with round-robin failover, compress, replicate
//! to the object store, prune both backends. The scheduler drives one pass
//! per timer tick and threads the sticky cursor between passes; nothing here
//! survives a pass except through the returned report.

use crate::domain::entities::Node;
use crate::domain::errors::{DumpError, PassError};
use crate::domain::ports::{DumpRunner, NodeDiscovery};
use crate::domain::services::{NodeSelector, RetentionPolicy};
use crate::infrastructure::ArchiveStore;
use crate::application::RemoteSync;
use std::sync::Arc;

/// Outcome of a successful pass.
#[derive(Debug)]
pub struct PassReport {
    /// Node the dump ultimately succeeded on
    pub node: Node,
    pub archive_name: String,
    /// Start index for the next pass's selector: the index that succeeded,
    /// so the next run stays on the known-good replica.
    pub next_start: usize,
    pub pruned_local: usize,
    pub pruned_remote: usize,
}

pub struct BackupPipeline {
    discovery: Arc<dyn NodeDiscovery>,
    dump_runner: Arc<dyn DumpRunner>,
    archive: ArchiveStore,
    remote: RemoteSync,
    policy: RetentionPolicy,
}

impl BackupPipeline {
    pub fn new(
        discovery: Arc<dyn NodeDiscovery>,
        dump_runner: Arc<dyn DumpRunner>,
        archive: ArchiveStore,
        remote: RemoteSync,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            discovery,
            dump_runner,
            archive,
            remote,
            policy,
        }
    }

    /// Execute one full pass. Any stage failure short-circuits the rest of
    /// the pass; the error is terminal for the pass, never for the daemon.
    pub async fn run_once(&self, start_hint: usize) -> Result<PassReport, PassError> {
        let (node, next_start) = self.dump_stage(start_hint).await?;

        tracing::info!("compressing dump directory");
        let archive = self
            .archive
            .compress()
            .await
            .map_err(PassError::Compression)?;
        tracing::info!("created archive {}", archive.name);

        self.remote
            .ensure_bucket()
            .await
            .map_err(PassError::Upload)?;
        self.remote.upload(&archive).await.map_err(PassError::Upload)?;

        tracing::info!("removing old backups from local storage");
        let pruned_local = self
            .archive
            .prune(self.policy)
            .await
            .map_err(PassError::PruneLocal)?;
        tracing::info!("removing old backups from object storage");
        let pruned_remote = self
            .remote
            .prune(self.policy)
            .await
            .map_err(PassError::PruneRemote)?;

        Ok(PassReport {
            node,
            archive_name: archive.name,
            next_start,
            pruned_local,
            pruned_remote,
        })
    }

    /// Discovery plus the bounded failover loop.
    ///
    /// Each discovered node is tried at most once, in discovery order
    /// starting from the sticky hint. The workspace is reset before every
    /// attempt so a refused node's partial output never reaches an archive.
    async fn dump_stage(&self, start_hint: usize) -> Result<(Node, usize), PassError> {
        tracing::info!("discovering read-replica destinations");
        let nodes = self.discovery.fetch_nodes().await?;
        let mut selector = NodeSelector::new(nodes, start_hint);
        if selector.is_empty() {
            return Err(PassError::AllNodesUnavailable { attempts: 0 });
        }
        tracing::info!("discovered {} destination(s)", selector.node_count());

        while let Some((idx, candidate)) = selector.next_candidate() {
            let node = candidate.clone();
            self.archive
                .reset_dump_dir()
                .await
                .map_err(PassError::Workspace)?;

            match self.dump_runner.dump(&node).await {
                Ok(()) => {
                    tracing::info!("dump finished on {}", node);
                    return Ok((node, idx));
                }
                Err(DumpError::ConnectionRefused { node, output }) => {
                    tracing::warn!("{node} refused the connection, failing over: {output}");
                }
                Err(DumpError::Failed { output }) => {
                    return Err(PassError::DumpFatal {
                        node: node.to_string(),
                        output,
                    });
                }
                Err(DumpError::Io(e)) => return Err(PassError::DumpTool(e)),
            }
        }

        Err(PassError::AllNodesUnavailable {
            attempts: selector.attempts(),
        })
    }
}
