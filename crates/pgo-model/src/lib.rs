mod domain;
pub use domain::{
    ChildOutcome, FailedArtifact, ProfileArtifact, ShutdownKind, UploadReport, UploadedArtifact,
    WorkerSpec,
};

pub mod exit;
