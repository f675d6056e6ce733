//! Error types for CLI commands.

use std::fmt;
use std::path::PathBuf;

/// Failures surfaced by `flowdeck` subcommands.
#[derive(Debug)]
pub enum CliError {
    /// The flow file could not be read or written.
    Io { path: PathBuf, details: String },
    /// The flow file is not a valid flow definition.
    Decode { path: PathBuf, details: String },
    /// The flow decoded but has error-severity issues.
    InvalidFlow { path: PathBuf, errors: usize },
    /// Writing command output failed.
    Output { details: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, details } => {
                write!(f, "cannot access '{}': {}", path.display(), details)
            }
            Self::Decode { path, details } => {
                write!(f, "'{}' is not a valid flow: {}", path.display(), details)
            }
            Self::InvalidFlow { path, errors } => {
                write!(f, "'{}' has {} error(s)", path.display(), errors)
            }
            Self::Output { details } => write!(f, "failed to write output: {}", details),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_file() {
        let err = CliError::InvalidFlow {
            path: PathBuf::from("welcome.json"),
            errors: 2,
        };
        assert_eq!(err.to_string(), "'welcome.json' has 2 error(s)");
    }
}
