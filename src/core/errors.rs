//! PSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for pii_sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[PSW-1001] invalid pattern for rule '{rule}' ({pattern}): {details}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        details: String,
    },

    #[error("[PSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[PSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[PSW-2001] scan root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("[PSW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[PSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[PSW-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },
}

impl SweepError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "PSW-1001",
            Self::MissingConfig { .. } => "PSW-1002",
            Self::ConfigParse { .. } => "PSW-1003",
            Self::RootNotFound { .. } => "PSW-2001",
            Self::Serialization { .. } => "PSW-2101",
            Self::Io { .. } => "PSW-3002",
            Self::ChannelClosed { .. } => "PSW-3003",
        }
    }

    /// Whether the error aborts the run.
    ///
    /// Per-file IO failures and bad individual patterns are recovered locally
    /// (file skipped, rule dropped with a warning); only pre-scan failures —
    /// a missing scan root or an unloadable configuration — are fatal.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> Vec<SweepError> {
        vec![
            SweepError::InvalidPattern {
                rule: String::new(),
                pattern: String::new(),
                details: String::new(),
            },
            SweepError::MissingConfig {
                path: PathBuf::new(),
            },
            SweepError::ConfigParse {
                context: "",
                details: String::new(),
            },
            SweepError::RootNotFound {
                path: PathBuf::new(),
            },
            SweepError::Serialization {
                context: "",
                details: String::new(),
            },
            SweepError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            },
            SweepError::ChannelClosed { component: "" },
        ]
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = sample_errors();
        let codes: Vec<&str> = errors.iter().map(SweepError::code).collect();
        let unique: std::collections::HashSet<&&str> = codes.iter().collect();
        assert_eq!(
            codes.len(),
            unique.len(),
            "error codes must be unique: {codes:?}"
        );
    }

    #[test]
    fn error_codes_have_psw_prefix() {
        for err in &sample_errors() {
            assert!(
                err.code().starts_with("PSW-"),
                "code {} must start with PSW-",
                err.code()
            );
        }
    }

    #[test]
    fn error_display_includes_code() {
        let err = SweepError::InvalidPattern {
            rule: "Email Address".to_string(),
            pattern: "[".to_string(),
            details: "unclosed character class".to_string(),
        };
        let msg = err.to_string();
        assert!(
            msg.contains("PSW-1001"),
            "display should contain error code: {msg}"
        );
        assert!(
            msg.contains("Email Address"),
            "display should contain rule name: {msg}"
        );
    }

    #[test]
    fn only_pre_scan_failures_are_fatal() {
        assert!(
            SweepError::RootNotFound {
                path: PathBuf::new()
            }
            .is_fatal()
        );
        assert!(
            SweepError::MissingConfig {
                path: PathBuf::new()
            }
            .is_fatal()
        );
        assert!(
            SweepError::ConfigParse {
                context: "",
                details: String::new()
            }
            .is_fatal()
        );

        assert!(
            !SweepError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other("test"),
            }
            .is_fatal()
        );
        assert!(
            !SweepError::InvalidPattern {
                rule: String::new(),
                pattern: String::new(),
                details: String::new(),
            }
            .is_fatal()
        );
        assert!(!SweepError::ChannelClosed { component: "test" }.is_fatal());
    }

    #[test]
    fn io_convenience_constructor() {
        let err = SweepError::io(
            "/tmp/test.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.code(), "PSW-3002");
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= invalid").unwrap_err();
        let err: SweepError = toml_err.into();
        assert_eq!(err.code(), "PSW-1003");
    }
}
