mod config;
pub use config::{Config, ConfigError};

mod run;
pub use run::{RunSummary, run};
