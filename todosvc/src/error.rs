//! Error types for the todo service.
//!
//! # Design
//! Every request-level failure collapses to HTTP 500 with a short literal
//! diagnostic naming the operation and the sub-step that failed. The
//! underlying cause never reaches the client; it is logged when the
//! `ApiError` is built. Startup failures are a separate type because they end
//! the process instead of a request.

use std::string::FromUtf8Error;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures from a `TodoStore`, tagged by the SQL step that failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The List select failed before any row was returned.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// A row could not be fetched or decoded after the listing had started.
    #[error("row scan failed: {0}")]
    Scan(#[source] sqlx::Error),

    #[error("prepare failed: {0}")]
    Prepare(#[source] sqlx::Error),

    #[error("exec failed: {0}")]
    Exec(#[source] sqlx::Error),
}

/// Failures reading a request body into a note.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("body read failed: {0}")]
    Read(#[from] axum::Error),

    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Anything that stops the process before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("opening database connection: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("running db migration. sql={sql} err={source}")]
    Migrate {
        sql: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The request-level operations, used to label diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "List",
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }
}

/// A request failure rendered as `500` with a plain-text diagnostic.
#[derive(Debug)]
pub struct ApiError {
    message: String,
}

impl ApiError {
    /// Log `cause` next to `message` and build the client-facing error.
    pub fn new(message: impl Into<String>, cause: &dyn std::error::Error) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{message}");
        Self { message }
    }

    pub fn body(op: Operation, cause: &BodyError) -> Self {
        Self::new(format!("500 - {} unable to read POST body", op.as_str()), cause)
    }

    pub fn store(op: Operation, cause: &StoreError) -> Self {
        let message = match cause {
            StoreError::Query(_) | StoreError::Scan(_) => {
                "500 - Unable to select from todo table".to_string()
            }
            StoreError::Prepare(_) => format!("500 - {} unable to prepare sql", op.as_str()),
            StoreError::Exec(_) => format!("500 - {} unable to exec sql", op.as_str()),
        };
        Self::new(message, cause)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response()
    }
}
