//! Local Archive Store
//!
//! Owns the dump workspace and the backups directory: resets the workspace
//! before each dump attempt, compresses a finished dump into a timestamped
//! tar.gz, and prunes local archives beyond the retention count.

use crate::domain::entities::{archive_file_name, parse_archive_name, BackupArchive};
use crate::domain::services::RetentionPolicy;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ArchiveStore {
    dump_dir: PathBuf,
    backups_dir: PathBuf,
}

impl ArchiveStore {
    pub fn new(dump_dir: impl Into<PathBuf>, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            dump_dir: dump_dir.into(),
            backups_dir: backups_dir.into(),
        }
    }

    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Remove and recreate the dump workspace.
    ///
    /// Runs before every dump attempt so debris from a previous run, or from
    /// a refused node's partial output, can never leak into a new archive.
    pub async fn reset_dump_dir(&self) -> io::Result<()> {
        tracing::debug!("resetting dump directory {:?}", self.dump_dir);
        match tokio::fs::remove_dir_all(&self.dump_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        tokio::fs::create_dir_all(&self.dump_dir).await
    }

    /// Compress the dump workspace into `<backups>/<timestamp>.tar.gz`.
    ///
    /// The timestamp is captured at compression start. On failure a partial
    /// archive may remain on disk; its name will still parse, so the next
    /// prune treats it like any other archive and nothing downstream may
    /// assume it is valid.
    pub async fn compress(&self) -> io::Result<BackupArchive> {
        let created_at = Utc::now();
        let name = archive_file_name(created_at);
        let dest = self.backups_dir.join(&name);

        let dump_dir = self.dump_dir.clone();
        let path = dest.clone();
        tokio::task::spawn_blocking(move || compress_dir(&dump_dir, &path))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;

        Ok(BackupArchive {
            path: dest,
            name,
            created_at,
        })
    }

    /// Delete parseable archives beyond the retention count, newest kept.
    ///
    /// Only regular files directly under the backups directory participate.
    /// Files without the archive suffix or with an unparsable timestamp are
    /// never deleted and never counted toward the threshold. A deletion
    /// error aborts the prune; deletions already performed in this pass
    /// stand.
    pub async fn prune(&self, policy: RetentionPolicy) -> io::Result<usize> {
        let mut archives = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.backups_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(created_at) = parse_archive_name(&name) else {
                continue;
            };
            archives.push(BackupArchive {
                path: entry.path(),
                name,
                created_at,
            });
        }

        let victims = policy.excess(archives, |a| a.created_at);
        let removed = victims.len();
        for archive in victims {
            tracing::info!("pruning local archive {}", archive.name);
            tokio::fs::remove_file(&archive.path).await?;
        }
        Ok(removed)
    }
}

fn compress_dir(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(dest)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", src)?;
    let encoder = builder.into_inner()?;
    encoder.finish()?;
    Ok(())
}
