// ABOUTME: Defines all error types for the herald library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under HeraldError.

/// Top-level error type for the herald library.
#[derive(Debug, thiserror::Error)]
pub enum HeraldError {
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Errors from tool registration, lookup, and argument validation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    Unknown(String),

    #[error("Tool already registered: {0}")]
    DuplicateName(String),

    #[error("Invalid arguments at '{path}': {message}")]
    Validation { path: String, message: String },

    #[error("Execution failed: {0}")]
    Execution(#[source] anyhow::Error),
}

/// Errors from the confirmation gate.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("No pending call with id '{0}'")]
    UnknownCall(String),

    #[error("Tool '{0}' requires confirmation but has no confirmed executor registered")]
    ExecutorNotFound(String),
}

/// Errors from schedule construction and store operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Trigger does not match schedule kind: {0}")]
    InvalidTrigger(String),

    #[error("Invalid cron expression '{expr}': {message}")]
    InvalidCron { expr: String, message: String },

    #[error("Timestamp {0} is already in the past")]
    PastTimestamp(chrono::DateTime<chrono::Utc>),

    #[error("Unknown schedule id: {0}")]
    UnknownSchedule(String),
}

/// Errors from the marketing-platform API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Remote { status: u16, body: String },

    #[error("{0} not found")]
    NotFound(String),
}
