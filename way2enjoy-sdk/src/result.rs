// ABOUTME: Result values built from a single API response
// ABOUTME: ResultMeta exposes header metadata; ImageResult adds the image bytes

use bytes::Bytes;
use http::HeaderMap;
use std::path::Path;

use crate::request::OperationResponse;
use crate::storage;
use crate::Result;

/// Image metadata reported in response headers.
#[derive(Debug, Clone, Default)]
pub struct ResultMeta {
    headers: HeaderMap,
}

impl ResultMeta {
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    pub fn width(&self) -> Option<u64> {
        self.number("image-width")
    }

    pub fn height(&self) -> Option<u64> {
        self.number("image-height")
    }

    /// Byte size of the image, from `content-length`
    pub fn size(&self) -> Option<u64> {
        self.number("content-length")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.text("content-type")
    }

    /// Where the image now lives; `None` when the response had no location
    pub fn location(&self) -> Option<&str> {
        self.text("location")
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn number(&self, name: &str) -> Option<u64> {
        self.text(name)
            .and_then(|value| value.trim().parse::<u64>().ok())
    }
}

/// Processed image: metadata plus the bytes.
#[derive(Debug, Clone)]
pub struct ImageResult {
    meta: ResultMeta,
    data: Bytes,
}

impl ImageResult {
    pub fn new(headers: HeaderMap, data: impl Into<Bytes>) -> Self {
        Self {
            meta: ResultMeta::new(headers),
            data: data.into(),
        }
    }

    pub fn meta(&self) -> &ResultMeta {
        &self.meta
    }

    pub fn width(&self) -> Option<u64> {
        self.meta.width()
    }

    pub fn height(&self) -> Option<u64> {
        self.meta.height()
    }

    pub fn size(&self) -> Option<u64> {
        self.meta.size()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.meta.content_type()
    }

    pub fn location(&self) -> Option<&str> {
        self.meta.location()
    }

    /// File extension matching the content type, e.g. `png`
    pub fn extension(&self) -> Option<&str> {
        self.content_type()
            .and_then(|content_type| content_type.strip_prefix("image/"))
            .map(|subtype| subtype.split(';').next().unwrap_or(subtype).trim())
            .filter(|subtype| !subtype.is_empty())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn to_buffer(&self) -> Bytes {
        self.data.clone()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub async fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        storage::write(path, &self.data).await
    }
}

impl From<OperationResponse> for ImageResult {
    fn from(response: OperationResponse) -> Self {
        Self::new(response.headers, response.body)
    }
}

/// Outcome of a store command.
#[derive(Debug, Clone)]
pub enum StoreResult {
    /// The service acknowledged with a location for the stored copy
    Meta(ResultMeta),
    /// The service answered with the image itself
    Image(ImageResult),
}

impl StoreResult {
    pub(crate) fn from_response(response: OperationResponse) -> Self {
        if response.location().is_some() {
            StoreResult::Meta(ResultMeta::new(response.headers))
        } else {
            StoreResult::Image(response.into())
        }
    }

    pub fn meta(&self) -> &ResultMeta {
        match self {
            StoreResult::Meta(meta) => meta,
            StoreResult::Image(image) => image.meta(),
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.meta().location()
    }

    /// Image bytes, when the response carried them
    pub fn to_buffer(&self) -> Option<Bytes> {
        match self {
            StoreResult::Meta(_) => None,
            StoreResult::Image(image) => Some(image.to_buffer()),
        }
    }
}
