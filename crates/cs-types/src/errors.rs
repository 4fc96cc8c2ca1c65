use thiserror::Error;

/// Main error type for the chirpswarm system
#[derive(Error, Debug)]
pub enum CsError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Detector mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Result sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Settings-file errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("{path}:{line}: malformed entry (expected 'key = value'): {content}")]
    MalformedLine {
        path: String,
        line: usize,
        content: String,
    },

    #[error("missing required key '{key}' in {path}")]
    MissingKey { path: String, key: String },

    #[error("invalid value for '{key}': '{value}' is not a valid {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

/// Detector-mapping errors
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("unknown detector name: {name}")]
    UnknownDetector { name: String },

    #[error("detector {name} is mapped more than once")]
    Duplicate { name: String },

    #[error("detector mapping {path} contains no entries")]
    Empty { path: String },
}

/// Coordinator/worker protocol errors. These are fatal; the protocol never
/// retries a failed exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("all workers disconnected after {completed} of {expected} results")]
    Disconnected { completed: usize, expected: usize },
}

/// Result-sink errors
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("cannot append to result file {path}: {source}")]
    Append {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result-record parse errors
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("expected {expected} fields in result line, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field {index} of result line is not numeric: '{value}'")]
    InvalidField { index: usize, value: String },
}

/// Result type alias for chirpswarm operations
pub type CsResult<T> = Result<T, CsError>;

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::CsError::Config(format!($($arg)*))
    };
}

/// Macro for creating resource errors
#[macro_export]
macro_rules! resource_error {
    ($($arg:tt)*) => {
        $crate::CsError::Resource(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::CsError::Internal(format!($($arg)*))
    };
}
