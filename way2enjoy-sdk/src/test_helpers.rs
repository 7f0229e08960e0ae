// ABOUTME: Test helper utilities for mocking way2enjoy API responses and transports
// ABOUTME: Provides a mockito server and a scripted in-process transport for retry tests

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use bytes::Bytes;
#[cfg(test)]
use http::{HeaderMap, HeaderName, HeaderValue};
#[cfg(test)]
use mockito::{Server, ServerGuard};
#[cfg(test)]
use parking_lot::Mutex;
#[cfg(test)]
use secrecy::SecretString;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::builder::ClientConfig;
#[cfg(test)]
use crate::transport::{
    TlsVersion, Transport, TransportCapabilities, TransportFailure, TransportRequest,
    TransportResponse,
};
#[cfg(test)]
use crate::usage::UsageCounter;
#[cfg(test)]
use crate::Way2enjoyClient;

#[cfg(test)]
pub async fn mock_api_server() -> ServerGuard {
    Server::new_async().await
}

#[cfg(test)]
pub type ScriptedReply = Result<TransportResponse, TransportFailure>;

/// Transport replaying a fixed list of replies and recording every request.
#[cfg(test)]
#[derive(Clone)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
    capabilities: TransportCapabilities,
}

#[cfg(test)]
impl ScriptedTransport {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
            capabilities: TransportCapabilities {
                secure: true,
                min_tls: TlsVersion::Tls1_2,
            },
        }
    }

    pub fn with_capabilities(mut self, capabilities: TransportCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn response(status: u16, headers: &[(&str, &str)], body: &str) -> TransportResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        TransportResponse {
            status,
            headers: map,
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    /// Body of the most recent request as text, empty when none was sent
    pub fn last_body(&self) -> String {
        self.requests
            .lock()
            .last()
            .and_then(|request| request.body.clone())
            .map(|body| String::from_utf8_lossy(&body).into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for ScriptedTransport {
    fn capabilities(&self) -> TransportCapabilities {
        self.capabilities
    }

    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::new("No scripted reply left", Some(2))))
    }
}

#[cfg(test)]
pub fn scripted_client(transport: &ScriptedTransport) -> Way2enjoyClient {
    let mut config = ClientConfig::new(SecretString::new("valid".to_string().into_boxed_str()));
    config.retry_delay = std::time::Duration::ZERO;
    Way2enjoyClient::with_transport(config, Arc::new(transport.clone()))
        .unwrap()
        .with_usage_counter(Arc::new(UsageCounter::new()))
}

#[cfg(test)]
pub fn status_only(status: u16) -> TransportResponse {
    ScriptedTransport::response(status, &[], "")
}

#[cfg(test)]
pub fn json_error(status: u16, error: &str, message: &str) -> TransportResponse {
    let body = serde_json::json!({ "error": error, "message": message }).to_string();
    ScriptedTransport::response(status, &[], &body)
}

#[cfg(test)]
pub fn created_at(location: &str) -> TransportResponse {
    ScriptedTransport::response(201, &[("Location", location)], "")
}

#[cfg(test)]
pub fn image_body(body: &str) -> TransportResponse {
    ScriptedTransport::response(200, &[("Content-Type", "image/png")], body)
}
