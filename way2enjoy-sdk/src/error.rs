// ABOUTME: Custom error types for the way2enjoy SDK with user-friendly messages
// ABOUTME: Separates account, client, server, connection, transport and filesystem faults

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Server-reported error fields plus the HTTP status they arrived with.
///
/// Displays as `"<message> (HTTP <status>/<code>)"`, or just the message for
/// errors raised locally without a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: String,
    pub code: Option<String>,
    pub status: Option<u16>,
}

impl ErrorDetails {
    pub fn new(message: impl Into<String>, code: Option<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            code,
            status,
        }
    }

    /// Details for an error raised before any request was made
    pub fn local(message: impl Into<String>) -> Self {
        Self::new(message, None, None)
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} (HTTP {}/{})",
                self.message,
                status,
                self.code.as_deref().unwrap_or_default()
            ),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum Way2enjoyError {
    /// Credentials or quota problem
    #[error("{0}")]
    Account(ErrorDetails),

    /// The request itself was rejected
    #[error("{0}")]
    Client(ErrorDetails),

    /// Server fault or unparsable response
    #[error("{0}")]
    Server(ErrorDetails),

    #[error("{}", connection_message(.message, .code))]
    Connection { message: String, code: Option<i32> },

    /// The local HTTP stack does not meet the security floor
    #[error("{0}")]
    UnsupportedTransport(String),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn connection_message(message: &str, code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("Error while connecting: {message} (#{code})"),
        None => format!("Error while connecting: {message}"),
    }
}

impl Way2enjoyError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            Way2enjoyError::Account(details) if details.status.is_none() => {
                Some("Provide an API key with way2enjoy_sdk::set_key(...) or the client builder")
            }
            Way2enjoyError::Account(details) if details.status == Some(429) => {
                Some("Your monthly limit has been reached. Wait or upgrade your plan")
            }
            Way2enjoyError::Account(_) => Some("Check that your API key is valid"),
            Way2enjoyError::Connection { .. } => {
                Some("Check your internet connection and proxy settings, then try again")
            }
            Way2enjoyError::UnsupportedTransport(_) => {
                Some("Rebuild with a TLS-enabled HTTP stack supporting TLS 1.2 or newer")
            }
            _ => None,
        }
    }

    /// Transient faults get one retry from the request engine
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Way2enjoyError::Connection { .. } | Way2enjoyError::Server(_)
        )
    }

    /// HTTP status carried by the error, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Way2enjoyError::Account(details)
            | Way2enjoyError::Client(details)
            | Way2enjoyError::Server(details) => details.status,
            _ => None,
        }
    }

    /// Server error code (or `ParseError`), if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Way2enjoyError::Account(details)
            | Way2enjoyError::Client(details)
            | Way2enjoyError::Server(details) => details.code.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Way2enjoyError::Io {
            path: path.into(),
            source,
        }
    }
}
