use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use pgo_model::ProfileArtifact;

use crate::error::ScanError;

/// Enumerate profiling artifacts in `dir`, non-recursively, keeping only
/// regular files with the `ext` extension.
///
/// A missing directory yields an empty list rather than an error: a worker
/// that crashed early may never have created it, and there is still a
/// meaningful (empty) upload report to produce.
pub async fn scan_profiles(dir: &Path, ext: &str) -> Result<Vec<ProfileArtifact>, ScanError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(target: "pgod.scan", dir = %dir.display(), "artifact directory does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ScanError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut artifacts = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(ScanError::ReadDir {
                    dir: dir.to_path_buf(),
                    source,
                });
            }
        };

        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some(ext) {
            continue;
        }
        let meta = entry.metadata().await.map_err(|source| ScanError::Stat {
            path: path.clone(),
            source,
        })?;
        if !meta.is_file() {
            continue;
        }

        artifacts.push(ProfileArtifact {
            file_name: entry.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            path,
        });
    }

    // Deterministic ordering keeps logs and reports stable across runs.
    artifacts.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!(target: "pgod.scan", dir = %dir.display(), count = artifacts.len(), "artifact scan complete");
    Ok(artifacts)
}
