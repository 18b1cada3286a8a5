mod worker_spec;
pub use worker_spec::WorkerSpec;

mod shutdown_kind;
pub use shutdown_kind::ShutdownKind;

mod child_outcome;
pub use child_outcome::ChildOutcome;

mod profile_artifact;
pub use profile_artifact::ProfileArtifact;

mod upload_report;
pub use upload_report::{FailedArtifact, UploadReport, UploadedArtifact};
