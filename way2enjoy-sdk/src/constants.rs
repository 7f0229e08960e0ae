// ABOUTME: Centralized constants for the way2enjoy SDK
// ABOUTME: Contains retry policy, timeouts, endpoints, header names and transport floors

/// Retry policy constants
pub mod retry {
    use std::time::Duration;

    /// Number of retries granted to a transient fault. Fixed: one retry, then the
    /// second attempt's error is returned.
    pub const MAX_RETRIES: u32 = 1;

    /// Pause between the failed attempt and its retry
    pub const RETRY_DELAY: Duration = Duration::from_millis(500);
}

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for a single HTTP attempt
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// API endpoints
pub mod urls {
    /// Base URL for the way2enjoy API
    pub const API_BASE: &str = "https://api.way2enjoy.com";

    /// Upload endpoint; every chain starts here
    pub const SHRINK_PATH: &str = "/shrink";
}

/// Header names, canonical case for writing
pub mod headers {
    pub const COMPRESSION_COUNT: &str = "Compression-Count";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const USER_AGENT: &str = "User-Agent";
    pub const LOCATION: &str = "Location";

    pub const JSON_CONTENT_TYPE: &str = "application/json";

    /// Username half of the basic credential; the API key is the password
    pub const AUTH_USER: &str = "api";
}

/// Library identification sent in every User-Agent
pub mod agent {
    pub const LIBRARY_NAME: &str = "way2enjoy-rust";
    pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Error classification constants
pub mod errors {
    /// Client error status code range
    pub const CLIENT_ERROR_MIN: u16 = 400;
    pub const CLIENT_ERROR_MAX: u16 = 499;

    /// Server error status code range
    pub const SERVER_ERROR_MIN: u16 = 500;
    pub const SERVER_ERROR_MAX: u16 = 599;

    pub const UNAUTHORIZED: u16 = 401;
    pub const TOO_MANY_REQUESTS: u16 = 429;

    /// Server `error` codes that describe the account rather than the request
    pub const ACCOUNT_ERROR_CODES: &[&str] = &[
        "Unauthorized",
        "TooManyRequests",
        "Too many requests",
        "AccountLocked",
        "PaymentRequired",
    ];

    /// Error code attached to unparsable error bodies
    pub const PARSE_ERROR_CODE: &str = "ParseError";

    /// Error code attached to a successful upload lacking a Location header
    pub const MISSING_LOCATION_CODE: &str = "MissingLocation";
}

/// Local preconditions on the transport, checked before any request
pub mod transport {
    use crate::transport::TlsVersion;

    /// Oldest TLS protocol version the transport may negotiate
    pub const MIN_TLS_VERSION: TlsVersion = TlsVersion::Tls1_2;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TlsVersion;
    use std::time::Duration;

    #[test]
    fn test_retry_constants() {
        assert_eq!(retry::MAX_RETRIES, 1);
        assert_eq!(retry::RETRY_DELAY, Duration::from_millis(500));
    }

    #[test]
    fn test_timeout_constants() {
        assert_eq!(timeouts::HTTP_REQUEST_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn test_url_constants() {
        assert!(urls::API_BASE.starts_with("https://"));
        assert_eq!(urls::SHRINK_PATH, "/shrink");
    }

    #[test]
    fn test_error_constants() {
        assert_eq!(errors::SERVER_ERROR_MIN, 500);
        assert_eq!(errors::SERVER_ERROR_MAX, 599);
        assert!(errors::ACCOUNT_ERROR_CODES.contains(&"Unauthorized"));
        assert!(!errors::ACCOUNT_ERROR_CODES.contains(&"BadRequest"));
    }

    #[test]
    fn test_transport_floor() {
        assert_eq!(transport::MIN_TLS_VERSION, TlsVersion::Tls1_2);
    }
}
