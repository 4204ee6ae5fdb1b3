use std::path::PathBuf;

use mailframe_columns::PolicyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("policy error in {path}: {source}")]
    Policy {
        path: PathBuf,
        #[source]
        source: PolicyError,
    },

    #[error("unsupported policy format: {path} (expected .toml or .json)")]
    UnsupportedPolicyFormat { path: PathBuf },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Policy { .. } | Self::UnsupportedPolicyFormat { .. } => 2,
            Self::InvalidArgument { .. } => 64,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn policy(path: impl Into<PathBuf>, source: PolicyError) -> Self {
        Self::Policy {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliError;
    use mailframe_columns::PolicyError;

    #[test]
    fn policy_errors_name_the_file() {
        let error = CliError::policy(
            "layout.toml",
            PolicyError::Validation(vec!["min_columns must be >= 1".into()]),
        );
        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.to_string(),
            "policy error in layout.toml: validation errors: min_columns must be >= 1"
        );
    }

    #[test]
    fn invalid_constructor_uses_usage_exit_code() {
        let error = CliError::invalid("bad flag");
        assert_eq!(error.exit_code(), 64);
        assert_eq!(error.to_string(), "invalid argument: bad flag");
    }

    #[test]
    fn io_errors_exit_with_one() {
        let error = CliError::from(std::io::Error::other("boom"));
        assert_eq!(error.exit_code(), 1);
    }
}
