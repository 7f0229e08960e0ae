// ABOUTME: Maps finished or failed transport attempts onto typed SDK errors
// ABOUTME: Reads the JSON error body of 4xx/5xx responses and builds diagnostic messages

use serde::Deserialize;

use crate::constants::errors;
use crate::error::{ErrorDetails, Way2enjoyError};
use crate::transport::TransportFailure;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify a completed response. Returns `None` for statuses below 400.
pub fn classify_response(status: u16, body: &[u8]) -> Option<Way2enjoyError> {
    if status < errors::CLIENT_ERROR_MIN {
        return None;
    }

    let parsed = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed,
        Err(err) => return Some(parse_error(status, &err)),
    };

    let details = ErrorDetails::new(
        parsed.message.unwrap_or_default(),
        parsed.error,
        Some(status),
    );

    Some(match status {
        errors::UNAUTHORIZED | errors::TOO_MANY_REQUESTS => Way2enjoyError::Account(details),
        errors::CLIENT_ERROR_MIN..=errors::CLIENT_ERROR_MAX
            if is_account_code(details.code.as_deref()) =>
        {
            Way2enjoyError::Account(details)
        }
        errors::CLIENT_ERROR_MIN..=errors::CLIENT_ERROR_MAX => Way2enjoyError::Client(details),
        _ => Way2enjoyError::Server(details),
    })
}

/// Classify a transport-level failure (DNS, TLS, refused, timeout).
pub fn classify_failure(failure: TransportFailure) -> Way2enjoyError {
    Way2enjoyError::Connection {
        message: failure.message,
        code: failure.code,
    }
}

fn is_account_code(code: Option<&str>) -> bool {
    code.is_some_and(|code| errors::ACCOUNT_ERROR_CODES.contains(&code))
}

fn parse_error(status: u16, err: &serde_json::Error) -> Way2enjoyError {
    Way2enjoyError::Server(ErrorDetails::new(
        format!(
            "Error while parsing response: {} (#{})",
            err,
            parse_error_number(err)
        ),
        Some(errors::PARSE_ERROR_CODE.to_string()),
        Some(status),
    ))
}

/// Stable numeric code per parse failure category
fn parse_error_number(err: &serde_json::Error) -> u8 {
    use serde_json::error::Category;

    match err.classify() {
        Category::Io => 1,
        Category::Data => 2,
        Category::Syntax | Category::Eof => 4,
    }
}
