use std::path::PathBuf;

/// Result type alias for taskwright operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for taskwright operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Command execution errors
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A task identifier that nothing is registered under
    #[error("task '{task}' not found")]
    TaskNotFound { task: String },

    /// Composite tasks that expand into each other
    #[error("Circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    /// Target rejected under the strict target policy
    #[error("unknown {intent} target '{target}'")]
    UnknownTarget { intent: String, target: String },

    /// Execution stopped by the operator
    #[error("interrupted while running '{task}'")]
    Interrupted { task: String },
}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    let invocation = if args_str.is_empty() {
        command.to_string()
    } else {
        format!("{command} {args_str}")
    };
    match exit_code {
        Some(code) => format!("command '{invocation}' failed with exit code {code}: {message}"),
        None => format!("command '{invocation}' failed: {message}"),
    }
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    #[must_use]
    pub fn task_not_found(task: impl Into<String>) -> Self {
        Error::TaskNotFound { task: task.into() }
    }

    #[must_use]
    pub fn circular_dependency(chain: Vec<String>) -> Self {
        Error::CircularDependency { chain }
    }

    #[must_use]
    pub fn unknown_target(intent: impl Into<String>, target: impl Into<String>) -> Self {
        Error::UnknownTarget {
            intent: intent.into(),
            target: target.into(),
        }
    }

    #[must_use]
    pub fn interrupted(task: impl Into<String>) -> Self {
        Error::Interrupted { task: task.into() }
    }

    /// Exit code of the failing external tool, if the error came from one
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::CommandExecution { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", f(), base_error),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_message_includes_exit_code() {
        let err =
            Error::command_execution("npx", vec!["lessc".into()], "task 'less' failed", Some(2));
        assert_eq!(
            err.to_string(),
            "command 'npx lessc' failed with exit code 2: task 'less' failed"
        );
        assert_eq!(err.exit_code(), Some(2));
    }

    #[test]
    fn test_command_error_without_args() {
        let err = Error::command_execution("true", vec![], "could not spawn", None);
        assert_eq!(err.to_string(), "command 'true' failed: could not spawn");
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_circular_dependency_lists_chain() {
        let err = Error::circular_dependency(vec!["a".into(), "b".into(), "a".into()]);
        assert!(err.to_string().contains("Circular dependency"));
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_context_wraps_as_configuration() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err = parsed.with_context(|| "loading tools".to_string()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().starts_with("configuration error: loading tools: JSON error:"));
    }
}
