use serde::{Deserialize, Serialize};

/// One artifact that reached the remote destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedArtifact {
    pub file_name: String,
    /// Remote location the artifact landed at.
    pub location: String,
}

/// One artifact that could not be transferred.
///
/// The local copy stays on disk; recovery is out-of-band, driven by whoever
/// reads this report in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedArtifact {
    pub file_name: String,
    pub cause: String,
}

/// Aggregate outcome of one upload pass over the artifact directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    /// Artifacts matching the naming convention at scan time.
    pub found: usize,
    pub uploaded: Vec<UploadedArtifact>,
    pub failed: Vec<FailedArtifact>,
}

impl UploadReport {
    pub fn new(found: usize) -> Self {
        Self {
            found,
            uploaded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn record_success(&mut self, file_name: impl Into<String>, location: impl Into<String>) {
        self.uploaded.push(UploadedArtifact {
            file_name: file_name.into(),
            location: location.into(),
        });
    }

    pub fn record_failure(&mut self, file_name: impl Into<String>, cause: impl Into<String>) {
        self.failed.push(FailedArtifact {
            file_name: file_name.into(),
            cause: cause.into(),
        });
    }

    /// True if every discovered artifact was uploaded.
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::UploadReport;

    #[test]
    fn empty_report_is_ok() {
        assert!(UploadReport::new(0).all_ok());
    }

    #[test]
    fn one_failure_taints_the_report() {
        let mut report = UploadReport::new(2);
        report.record_success("a.profraw", "s3://bucket/a.profraw");
        report.record_failure("b.profraw", "connection reset");
        assert!(!report.all_ok());
        assert_eq!(report.uploaded.len(), 1);
        assert_eq!(report.failed.len(), 1);
    }

    #[test]
    fn serializes_to_flat_json() {
        let mut report = UploadReport::new(1);
        report.record_success("a.profraw", "s3://bucket/p/a.profraw");
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""found":1"#));
        assert!(json.contains(r#""location":"s3://bucket/p/a.profraw""#));
    }
}
