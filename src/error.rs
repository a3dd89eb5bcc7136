//! Failure taxonomy for tool calls.
//!
//! Every failure raised while serving a call is funneled into `RubocopError`
//! and rendered to client-facing text at the dispatch boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RubocopError {
    /// The configured linter binary could not be found on PATH.
    #[error(
        "RuboCop is not installed or not found in PATH.\n\nTo install RuboCop:\n  gem install rubocop rubocop-rails"
    )]
    NotInstalled,

    /// The linter started but exited unexpectedly (or could not be driven).
    #[error("{message}")]
    Execution {
        message: String,
        exit_code: Option<i32>,
        stderr: Option<String>,
    },

    /// The linter's JSON output could not be decoded.
    #[error("Failed to parse RuboCop JSON output. The output may be malformed.")]
    Parse {
        raw_output: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RubocopError {
    pub fn execution(
        message: impl Into<String>,
        exit_code: Option<i32>,
        stderr: Option<String>,
    ) -> Self {
        RubocopError::Execution {
            message: message.into(),
            exit_code,
            stderr,
        }
    }

    /// Render the error as the text block returned to the client.
    pub fn render(&self) -> String {
        match self {
            RubocopError::NotInstalled | RubocopError::UnknownTool(_) => self.to_string(),
            RubocopError::Execution { message, stderr, .. } => {
                let mut msg = format!("Error running RuboCop: {message}");
                if let Some(err) = stderr.as_deref().map(str::trim)
                    && !err.is_empty()
                {
                    msg.push_str("\n\nStderr:\n");
                    msg.push_str(err);
                }
                msg
            }
            RubocopError::Parse { .. } => format!(
                "{self}\n\nIf this persists, please file an issue with the raw output."
            ),
            RubocopError::Other(e) => format!("Error: {e:#}"),
        }
    }
}

pub type Result<T, E = RubocopError> = std::result::Result<T, E>;
