use uuid::Uuid;

/// Remote key namespace for one supervisor run.
///
/// Keys embed the host name and a fresh run id, so two supervisor instances
/// racing on the same bucket can never overwrite each other's artifacts —
/// collisions are ruled out by construction, not by locking.
#[derive(Debug, Clone)]
pub struct RunScope {
    prefix: String,
    host: String,
    run_id: String,
}

impl RunScope {
    pub fn new(prefix: impl Into<String>) -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown-host".to_string());
        Self::with_parts(prefix, host, Uuid::new_v4().to_string())
    }

    pub fn with_parts(
        prefix: impl Into<String>,
        host: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into().trim_matches('/').to_string(),
            host: host.into(),
            run_id: run_id.into(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Remote key for one artifact file name.
    pub fn key(&self, file_name: &str) -> String {
        if self.prefix.is_empty() {
            format!("{}/{}/{}", self.host, self.run_id, file_name)
        } else {
            format!("{}/{}/{}/{}", self.prefix, self.host, self.run_id, file_name)
        }
    }
}
