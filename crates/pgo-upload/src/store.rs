use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::trace;

use crate::error::StoreError;

/// Destination for profiling artifacts.
///
/// `put` returns the remote location on success; failures carry enough
/// context to be logged next to the file identity.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, StoreError>;
}

/// Object-storage backend addressed by bare bucket name.
///
/// Credentials and region are ambient: the SDK's environment providers
/// resolve them, nothing is parameterized per call.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn connect(bucket: impl Into<String>) -> Self {
        let conf = aws_config::ConfigLoader::default()
            .credentials_provider(
                aws_config::environment::EnvironmentVariableCredentialsProvider::new(),
            )
            .load()
            .await;
        Self {
            client: Client::new(&conf),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ArtifactStore for S3Store {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<String, StoreError> {
        trace!(target: "pgod.store", bucket = %self.bucket, key, bytes = body.len(), "put object");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body.into())
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(format!("s3://{}/{}", self.bucket, key))
    }
}
