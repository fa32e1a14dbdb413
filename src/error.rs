use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use miette::{Diagnostic, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Unknown room: {0}")]
    #[diagnostic(
        code(roomsign::unknown_room),
        help("add the room to the rooms file with its calendar id")
    )]
    UnknownRoom(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(roomsign::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(roomsign::config))]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(roomsign::google_calendar))]
    GoogleCalendar(String),

    #[error("Invalid provider timestamp: {0}")]
    #[diagnostic(code(roomsign::time_format))]
    TimeFormat(String),

    #[error("Network error: {0}")]
    #[diagnostic(code(roomsign::network))]
    Network(String),

    #[error("Display error: {0}")]
    #[diagnostic(code(roomsign::display))]
    Display(String),

    #[error(transparent)]
    #[diagnostic(code(roomsign::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(roomsign::serialization))]
    Serialization(String),

    #[error("External error: {0}")]
    #[diagnostic(code(roomsign::external))]
    External(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Other error: {0}")]
    #[diagnostic(code(roomsign::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// JSON body returned for failed summary requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl Error {
    /// HTTP status and machine-readable code for this error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Error::UnknownRoom(_) => (StatusCode::NOT_FOUND, "unknown_room"),
            Error::GoogleCalendar(_) | Error::Network(_) | Error::TimeFormat(_) => {
                (StatusCode::BAD_GATEWAY, "provider_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            error!("Summary request failed: {}", self);
        }

        let body = ErrorResponse {
            error: code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create timestamp parsing errors
pub fn time_format_error(message: &str) -> Error {
    Error::TimeFormat(message.to_string())
}

/// Helper to create network errors
pub fn network_error(message: &str) -> Error {
    Error::Network(message.to_string())
}

/// Helper to create display errors
pub fn display_error(message: &str) -> Error {
    Error::Display(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
