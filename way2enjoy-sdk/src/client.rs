// ABOUTME: Way2enjoyClient and its request engine
// ABOUTME: Builds headers and body, runs the transport under the retry policy, tracks usage

use http::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

use crate::builder::ClientConfig;
use crate::classify::{classify_failure, classify_response};
use crate::constants::{agent, headers, urls};
use crate::error::{ErrorDetails, Way2enjoyError};
use crate::request::{OperationRequest, OperationResponse, Payload};
use crate::retry::{retry_transient, RetryConfig};
use crate::transport::{
    Credentials, ProxySettings, ReqwestTransport, Transport, TransportRequest, TransportResponse,
};
use crate::usage::UsageCounter;
use crate::Result;

/// Handle to the API. Cloning is cheap and clones share configuration,
/// transport and usage counter.
#[derive(Clone)]
pub struct Way2enjoyClient {
    inner: Arc<ClientInner>,
}

#[derive(Clone)]
struct ClientInner {
    config: ClientConfig,
    proxy: Option<ProxySettings>,
    transport: Arc<dyn Transport>,
    usage: Arc<UsageCounter>,
    base_url: String,
    user_agent: HeaderValue,
    retry: RetryConfig,
}

impl Way2enjoyClient {
    /// Client with default settings for `api_key`
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder()
            .api_key(SecretString::new(api_key.into().into_boxed_str()))
            .build()
    }

    /// Client talking through the reqwest transport
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        ensure_key(&config)?;
        let proxy = parse_proxy(&config)?;
        let transport = ReqwestTransport::new(config.timeout, proxy.as_ref())?;
        Self::assemble(config, proxy, Arc::new(transport))
    }

    /// Client talking through a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        ensure_key(&config)?;
        let proxy = parse_proxy(&config)?;
        Self::assemble(config, proxy, transport)
    }

    fn assemble(
        config: ClientConfig,
        proxy: Option<ProxySettings>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let agent = match &config.app_identifier {
            Some(app) => format!("{} {}", Self::user_agent(), app),
            None => Self::user_agent(),
        };
        let user_agent = HeaderValue::from_str(&agent).map_err(|_| {
            Way2enjoyError::Client(ErrorDetails::local(format!(
                "Invalid app identifier for User-Agent: {agent}"
            )))
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| urls::API_BASE.to_string());
        let retry = RetryConfig {
            delay: config.retry_delay,
        };

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                proxy,
                transport,
                usage: UsageCounter::global(),
                base_url,
                user_agent,
                retry,
            }),
        })
    }

    /// Same client reporting usage into `counter` instead of the global one
    #[must_use]
    pub fn with_usage_counter(&self, counter: Arc<UsageCounter>) -> Self {
        let mut inner = (*self.inner).clone();
        inner.usage = counter;
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Library identifier sent in every User-Agent
    pub fn user_agent() -> String {
        format!("{}/{}", agent::LIBRARY_NAME, agent::LIBRARY_VERSION)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.inner.proxy.as_ref()
    }

    pub fn usage(&self) -> &Arc<UsageCounter> {
        &self.inner.usage
    }

    /// Compression count from the last successful response seen by this client's counter
    pub fn compression_count(&self) -> Option<u64> {
        self.inner.usage.get()
    }

    /// Whether two handles share the same underlying client
    pub fn same_client(&self, other: &Way2enjoyClient) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Execute one operation with the transient-fault retry policy.
    pub async fn request(&self, request: &OperationRequest) -> Result<OperationResponse> {
        self.inner.transport.capabilities().ensure_supported()?;

        let transport_request = self.build_transport_request(request);
        let response = retry_transient(&self.inner.retry, |attempt| {
            let transport_request = transport_request.clone();
            async move { self.attempt(transport_request, attempt).await }
        })
        .await?;

        self.record_usage(&response.headers);

        Ok(OperationResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }

    /// Check the credential without compressing anything. A rejected empty
    /// upload or an exhausted quota both prove the key itself is accepted.
    pub async fn validate(&self) -> Result<()> {
        let request = OperationRequest::post(urls::SHRINK_PATH, Payload::Empty);
        match self.request(&request).await {
            Ok(_) | Err(Way2enjoyError::Client(_)) => Ok(()),
            Err(Way2enjoyError::Account(details)) if details.status == Some(429) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn attempt(
        &self,
        request: TransportRequest,
        attempt: u32,
    ) -> Result<TransportResponse> {
        log::debug!("{} {} (attempt {})", request.method, request.url, attempt + 1);

        let response = self
            .inner
            .transport
            .execute(request)
            .await
            .map_err(classify_failure)?;

        match classify_response(response.status, &response.body) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    fn build_transport_request(&self, request: &OperationRequest) -> TransportRequest {
        let mut header_map = HeaderMap::new();
        header_map.insert(USER_AGENT, self.inner.user_agent.clone());

        let body = match request.payload().encode() {
            Some((body, content_type)) => {
                if let Some(content_type) = content_type {
                    header_map.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                Some(body)
            }
            None => None,
        };

        TransportRequest {
            method: request.method().clone(),
            url: self.resolve_url(request.target()),
            credentials: Credentials {
                username: headers::AUTH_USER.to_string(),
                password: self.inner.config.api_key.clone(),
            },
            headers: header_map,
            body,
        }
    }

    fn resolve_url(&self, target: &str) -> String {
        if target.starts_with("https://") || target.starts_with("http://") {
            target.to_string()
        } else {
            format!("{}{}", self.inner.base_url.trim_end_matches('/'), target)
        }
    }

    fn record_usage(&self, response_headers: &HeaderMap) {
        let count = response_headers
            .get(headers::COMPRESSION_COUNT)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());

        if let Some(count) = count {
            log::debug!("Compression count is now {count}");
            self.inner.usage.set(count);
        }
    }
}

impl fmt::Debug for Way2enjoyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Way2enjoyClient")
            .field("config", &self.inner.config)
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// A missing credential outranks every other configuration problem
fn ensure_key(config: &ClientConfig) -> Result<()> {
    if config.api_key.expose_secret().is_empty() {
        return Err(Way2enjoyError::Account(ErrorDetails::local(
            "Provide an API key with way2enjoy_sdk::set_key(...)",
        )));
    }
    Ok(())
}

fn parse_proxy(config: &ClientConfig) -> Result<Option<ProxySettings>> {
    config
        .proxy
        .as_deref()
        .map(ProxySettings::parse)
        .transpose()
}
