use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("{operation} failed ({status}): {message}")]
    Upstream {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed record {id}: missing {field}")]
    MalformedRecord { id: String, field: &'static str },

    #[error("Invalid duration {value:?}: {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid spreadsheet location: {0}")]
    InvalidSpreadsheet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`Error`], stable across variant additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ChannelNotFound,
    UpstreamApi,
    MalformedRecord,
    Authentication,
    Configuration,
    Local,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ChannelNotFound(_) => ErrorKind::ChannelNotFound,
            Error::Upstream { .. } | Error::Http(_) => ErrorKind::UpstreamApi,
            Error::MalformedRecord { .. } | Error::InvalidDuration { .. } => {
                ErrorKind::MalformedRecord
            }
            Error::Authentication(_) => ErrorKind::Authentication,
            Error::Config(_) | Error::InvalidSpreadsheet(_) => ErrorKind::Configuration,
            Error::Io(_) | Error::Json(_) => ErrorKind::Local,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
