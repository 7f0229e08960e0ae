// ABOUTME: way2enjoy SDK library for compressing and transforming images remotely
// ABOUTME: Exposes the client, the operation chain, results and the default registry

pub mod builder;
pub mod classify;
pub mod client;
pub mod constants;
pub mod error;
pub mod options;
pub mod registry;
pub mod request;
pub mod result;
pub mod retry;
pub mod source;
pub mod storage;
pub mod test_helpers;
pub mod transport;
pub mod usage;

pub use builder::ClientConfig;
pub use client::Way2enjoyClient;
pub use error::{ErrorDetails, Way2enjoyError};
pub use options::{ConvertOptions, ResizeMethod, ResizeOptions, StoreOptions};
pub use registry::{
    client, from_buffer, from_file, from_url, set_app_identifier, set_client, set_key, set_proxy,
    validate,
};
pub use result::{ImageResult, ResultMeta, StoreResult};
pub use source::{Command, Source, Step};
pub use transport::{Transport, TransportCapabilities};
pub use usage::{compression_count, UsageCounter};

pub type Result<T> = std::result::Result<T, Way2enjoyError>;
