use tracing::{info, warn};

use pgo_model::{ProfileArtifact, UploadReport};

use crate::error::StoreError;
use crate::scope::RunScope;
use crate::store::ArtifactStore;

/// Transfer every artifact to the store under `scope`-derived keys.
///
/// Files are independent: a failure is recorded and the pass moves on to the
/// next artifact. No retries — the local copy stays on disk and the report
/// in the logs is the operator's recovery handle.
pub async fn upload_all<S>(store: &S, scope: &RunScope, artifacts: &[ProfileArtifact]) -> UploadReport
where
    S: ArtifactStore + ?Sized,
{
    let mut report = UploadReport::new(artifacts.len());

    for artifact in artifacts {
        let key = scope.key(&artifact.file_name);
        let result = match tokio::fs::read(&artifact.path).await {
            Ok(body) => store.put(&key, body).await,
            Err(source) => Err(StoreError::Read {
                path: artifact.path.clone(),
                source,
            }),
        };
        match result {
            Ok(location) => {
                info!(
                    target: "pgod.upload",
                    file = %artifact.file_name,
                    %location,
                    bytes = artifact.size,
                    "artifact uploaded"
                );
                report.record_success(&artifact.file_name, location);
            }
            Err(e) => {
                warn!(
                    target: "pgod.upload",
                    file = %artifact.file_name,
                    error = %e,
                    "artifact upload failed; local copy kept"
                );
                report.record_failure(&artifact.file_name, e.to_string());
            }
        }
    }

    report
}
