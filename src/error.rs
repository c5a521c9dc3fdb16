//! Error taxonomy for the lifecycle engine and git adapter.

use std::path::PathBuf;

/// Errors surfaced by workflows and the git adapter.
#[derive(Debug)]
pub enum Error {
    /// Bad user input, caught before any side effect.
    Validation(String),
    /// A spawned tool (git or the script shell) exited non-zero.
    Tool {
        /// Short description of what was invoked, e.g. `git worktree add`
        command: String,
        /// Trimmed combined output from the tool
        output: String,
    },
    /// A filesystem operation failed.
    Filesystem { path: PathBuf, source: std::io::Error },
    /// The thing being operated on no longer exists.
    NotFound(String),
}

impl Error {
    /// Helper for the common "path + io error" case.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "{}", msg),
            Error::Tool { command, output } => {
                if output.is_empty() {
                    write!(f, "{} failed", command)
                } else {
                    write!(f, "{} failed: {}", command, output)
                }
            }
            Error::Filesystem { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            Error::NotFound(what) => write!(f, "{} not found", what),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Filesystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_includes_output_when_present() {
        let err = Error::Tool {
            command: "git branch -D".to_string(),
            output: "error: branch 'x' not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git branch -D"));
        assert!(msg.contains("branch 'x' not found"));
    }

    #[test]
    fn tool_error_without_output_is_still_descriptive() {
        let err = Error::Tool {
            command: "git clone".to_string(),
            output: String::new(),
        };
        assert_eq!(err.to_string(), "git clone failed");
    }

    #[test]
    fn validation_displays_message_verbatim() {
        let err = Error::Validation("Name is required".to_string());
        assert_eq!(err.to_string(), "Name is required");
    }
}
