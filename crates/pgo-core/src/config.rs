use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use pgo_model::{ChildOutcome, WorkerSpec};

/// Environment variables understood by the supervisor.
pub const ENV_WORKER_PATH: &str = "PGO_WORKER_PATH";
pub const ENV_PROFILE_DIR: &str = "PGO_PROFILE_DIR";
pub const ENV_PROFILE_BUCKET: &str = "PGO_PROFILE_BUCKET";
pub const ENV_KEY_PREFIX: &str = "PGO_KEY_PREFIX";
pub const ENV_SIGNALED_KEY_PREFIX: &str = "PGO_SIGNALED_KEY_PREFIX";
pub const ENV_PROFILE_EXT: &str = "PGO_PROFILE_EXT";
pub const ENV_GRACE_SECS: &str = "PGO_GRACE_SECS";
pub const ENV_LOG_LEVEL: &str = "PGO_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "PGO_LOG_FORMAT";

const DEFAULT_KEY_PREFIX: &str = "profiles";
const DEFAULT_PROFILE_EXT: &str = "profraw";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// One-time snapshot of the supervisor's ambient configuration.
///
/// Collected at startup and passed down explicitly; components never read
/// the environment themselves.
#[derive(Debug, Clone)]
pub struct Config {
    pub worker: WorkerSpec,
    pub profile_dir: PathBuf,
    pub bucket: String,
    pub key_prefix: String,
    /// Alternate prefix for runs that were externally terminated, keeping
    /// interrupted profiles separable from normal ones. Optional; falls back
    /// to `key_prefix`.
    pub signaled_key_prefix: Option<String>,
    pub profile_ext: String,
    /// Bound on how long to wait for the worker after forwarding a shutdown
    /// signal. `None` waits indefinitely so profile buffers always flush.
    pub grace: Option<Duration>,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Snapshot from the process environment; `worker_args` is the argv tail
    /// passed through to the worker verbatim.
    pub fn from_env(worker_args: Vec<String>) -> Result<Self, ConfigError> {
        Self::from_lookup(worker_args, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(worker_args: Vec<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let worker_path = required(&lookup, ENV_WORKER_PATH)?;
        let profile_dir = required(&lookup, ENV_PROFILE_DIR)?;
        let bucket = required(&lookup, ENV_PROFILE_BUCKET)?;

        let grace = match lookup(ENV_GRACE_SECS) {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: ENV_GRACE_SECS,
                    value: raw.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
        };

        Ok(Self {
            worker: WorkerSpec::new(worker_path).with_args(worker_args),
            profile_dir: PathBuf::from(profile_dir),
            bucket,
            key_prefix: lookup(ENV_KEY_PREFIX).unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
            signaled_key_prefix: lookup(ENV_SIGNALED_KEY_PREFIX),
            profile_ext: lookup(ENV_PROFILE_EXT)
                .unwrap_or_else(|| DEFAULT_PROFILE_EXT.to_string()),
            grace,
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or_else(|| "info".to_string()),
            log_format: lookup(ENV_LOG_FORMAT).unwrap_or_else(|| "text".to_string()),
        })
    }

    /// Remote key prefix to use given how the run ended.
    pub fn prefix_for(&self, outcome: &ChildOutcome) -> &str {
        if outcome.externally_terminated() {
            self.signaled_key_prefix.as_deref().unwrap_or(&self.key_prefix)
        } else {
            &self.key_prefix
        }
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
