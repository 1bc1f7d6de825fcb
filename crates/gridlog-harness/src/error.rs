#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] gridlog_runtime::ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("{failed} script step(s) failed")]
    StepsFailed { failed: usize },
}

impl HarnessError {
    /// Process exit code, following the sysexits conventions.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } => 66,
            Self::Script(_) | Self::Config(_) => 65,
            Self::Logging(_) => 70,
            Self::StepsFailed { .. } => 1,
        }
    }
}
