// ABOUTME: HTTP transport abstraction and its reqwest-backed implementation
// ABOUTME: Performs one request per call and reports capabilities for the TLS floor check

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use secrecy::{ExposeSecret, SecretString};
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::constants::transport::MIN_TLS_VERSION;
use crate::error::Way2enjoyError;

/// TLS protocol versions, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Tls1_0,
    Tls1_1,
    Tls1_2,
    Tls1_3,
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TlsVersion::Tls1_0 => "TLS 1.0",
            TlsVersion::Tls1_1 => "TLS 1.1",
            TlsVersion::Tls1_2 => "TLS 1.2",
            TlsVersion::Tls1_3 => "TLS 1.3",
        };
        f.write_str(name)
    }
}

/// What the underlying HTTP stack can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportCapabilities {
    /// Built with TLS support at all
    pub secure: bool,
    /// Oldest protocol version the stack will negotiate
    pub min_tls: TlsVersion,
}

impl TransportCapabilities {
    /// Fails closed when the stack is below the security floor.
    pub fn ensure_supported(&self) -> Result<(), Way2enjoyError> {
        if !self.secure {
            return Err(Way2enjoyError::UnsupportedTransport(
                "Your HTTP stack does not support secure connections".to_string(),
            ));
        }
        if self.min_tls < MIN_TLS_VERSION {
            return Err(Way2enjoyError::UnsupportedTransport(format!(
                "Your HTTP stack allows {}; please restrict it to {} or higher",
                self.min_tls, MIN_TLS_VERSION
            )));
        }
        Ok(())
    }
}

/// Basic credentials embedded in every request
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Proxy split into its parts.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl ProxySettings {
    /// Parse `scheme://[user:pass@]host[:port]`. Malformed input is a connection
    /// error since it can never reach the network.
    pub fn parse(raw: &str) -> Result<Self, Way2enjoyError> {
        let invalid = |reason: String| Way2enjoyError::Connection {
            message: format!("Invalid proxy {raw}: {reason}"),
            code: None,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?;

        let username = (!url.username().is_empty()).then(|| url.username().to_string());
        let password = url
            .password()
            .map(|password| SecretString::new(password.to_string().into_boxed_str()));

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port: url.port_or_known_default(),
            username,
            password,
        })
    }

    /// Proxy address without userinfo
    pub fn address(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub credentials: Credentials,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Low-level failure: nothing usable came back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
    pub code: Option<i32>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>, code: Option<i32>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// Performs exactly one HTTP request per call.
#[async_trait]
pub trait Transport: Send + Sync {
    fn capabilities(&self) -> TransportCapabilities;

    async fn execute(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportFailure>;
}

/// Failure codes used when the OS did not report one
pub mod failure_codes {
    pub const CONNECT: i32 = 7;
    pub const TIMEOUT: i32 = 28;
    pub const TRANSFER: i32 = 56;
    pub const OTHER: i32 = 2;
}

/// Production transport on top of reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, proxy: Option<&ProxySettings>) -> Result<Self, Way2enjoyError> {
        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            // Header names go out in canonical case, e.g. `Content-Type`
            .http1_title_case_headers();

        if let Some(settings) = proxy {
            let mut proxy = reqwest::Proxy::all(settings.address()).map_err(|e| {
                Way2enjoyError::Connection {
                    message: format!("Invalid proxy configuration: {e}"),
                    code: None,
                }
            })?;
            if let Some(username) = &settings.username {
                let password = settings
                    .password
                    .as_ref()
                    .map(|p| p.expose_secret().to_string())
                    .unwrap_or_default();
                proxy = proxy.basic_auth(username, &password);
            }
            builder = builder.proxy(proxy);
        } else {
            // Only the configured proxy is honoured, never HTTP_PROXY and friends
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|e| Way2enjoyError::Connection {
            message: format!("Failed to initialise HTTP client: {e}"),
            code: None,
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn capabilities(&self) -> TransportCapabilities {
        TransportCapabilities {
            secure: true,
            min_tls: TlsVersion::Tls1_2,
        }
    }

    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .basic_auth(
                &request.credentials.username,
                Some(request.credentials.password.expose_secret()),
            )
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(failure_from)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(failure_from)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn failure_from(err: reqwest::Error) -> TransportFailure {
    let code = os_error_code(&err).or(Some(if err.is_timeout() {
        failure_codes::TIMEOUT
    } else if err.is_connect() {
        failure_codes::CONNECT
    } else if err.is_body() || err.is_decode() {
        failure_codes::TRANSFER
    } else {
        failure_codes::OTHER
    }));

    TransportFailure::new(err.to_string(), code)
}

fn os_error_code(err: &reqwest::Error) -> Option<i32> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if let Some(code) = io.raw_os_error() {
                return Some(code);
            }
        }
        source = cause.source();
    }
    None
}
