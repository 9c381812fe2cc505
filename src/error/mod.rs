//! Error handling for speedmeter

use thiserror::Error;

/// Custom error types for the speed tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server directory listing errors
    #[error("Server directory error: {0}")]
    Directory(String),

    /// Connection establishment or mid-test connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Wire protocol framing or command errors
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Server selection errors (no measurable candidate)
    #[error("Selection error: {0}")]
    Selection(String),

    /// Degenerate timing (zero or negative elapsed interval)
    #[error("Timing error: {0}")]
    Timing(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (URLs, listings, numbers)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new server directory error
    pub fn directory<S: Into<String>>(message: S) -> Self {
        Self::Directory(message.into())
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection(message.into())
    }

    /// Create a new protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol(message.into())
    }

    /// Create a new selection error
    pub fn selection<S: Into<String>>(message: S) -> Self {
        Self::Selection(message.into())
    }

    /// Create a new timing error
    pub fn timing<S: Into<String>>(message: S) -> Self {
        Self::Timing(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Directory(_) => "DIRECTORY",
            Self::Connection(_) => "CONNECTION",
            Self::Protocol(_) => "PROTOCOL",
            Self::Selection(_) => "SELECTION",
            Self::Timing(_) => "TIMING",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable (a later run may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Directory(_) | Self::Connection(_) | Self::Timing(_) => true,
            Self::Config(_) | Self::Parse(_) => false,
            Self::Protocol(_) | Self::Selection(_) | Self::Io(_) | Self::Internal(_) => false,
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Parse(_) => 1,
            Self::Directory(_) | Self::Connection(_) | Self::Selection(_) => 2,
            Self::Protocol(_) => 3,
            Self::Timing(_) => 4,
            Self::Io(_) | Self::Internal(_) => 5,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Directory(err.to_string())
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
