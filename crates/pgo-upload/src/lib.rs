mod error;
pub use error::{ScanError, StoreError};

mod scan;
pub use scan::scan_profiles;

mod scope;
pub use scope::RunScope;

mod store;
pub use store::{ArtifactStore, S3Store};

mod upload;
pub use upload::upload_all;
