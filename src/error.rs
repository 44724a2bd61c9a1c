use miette::Diagnostic;
use thiserror::Error;

/// Main error type for easel operations
#[derive(Error, Diagnostic, Debug)]
pub enum EaselError {
    #[error("IO error: {0}")]
    #[diagnostic(code(easel::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(easel::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(easel::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid parameter in {command}: expected {expected}, received {received:?}")]
    #[diagnostic(code(easel::invalid_parameter))]
    InvalidParameter {
        command: String,
        expected: String,
        received: String,
    },

    #[error("Unknown command: {name}")]
    #[diagnostic(code(easel::unknown_command))]
    UnknownCommand {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("{command} used outside its scope: {message}")]
    #[diagnostic(code(easel::scope))]
    Scope { command: String, message: String },

    #[error("Invalid command definition: {message}")]
    #[diagnostic(code(easel::definition))]
    Definition { message: String },

    #[error("Render error: {message}")]
    #[diagnostic(code(easel::render))]
    Render {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(easel::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl EaselError {
    /// Shorthand for an `InvalidParameter` error.
    pub fn invalid_parameter(
        command: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            command: command.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    /// Attribute an `InvalidParameter` error to the named command.
    ///
    /// Other variants pass through unchanged.
    pub fn in_command(self, name: &str) -> Self {
        match self {
            Self::InvalidParameter {
                expected, received, ..
            } => Self::InvalidParameter {
                command: name.to_string(),
                expected,
                received,
            },
            other => other,
        }
    }

    /// Shorthand for a `Render` error without help text.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EaselError>;
