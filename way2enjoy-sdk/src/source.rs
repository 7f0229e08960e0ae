// ABOUTME: Operation chain over a server-held image
// ABOUTME: Each command posts the merged command object to the current location

use bytes::Bytes;
use serde_json::{Map, Value};
use std::path::Path;

use crate::constants::urls;
use crate::options::{ConvertOptions, ResizeOptions, StoreOptions};
use crate::request::{OperationRequest, OperationResponse, Payload};
use crate::result::{ImageResult, StoreResult};
use crate::storage;
use crate::{ErrorDetails, Result, Way2enjoyClient, Way2enjoyError};

/// A server-side operation applied to a source.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize(ResizeOptions),
    Preserve(Vec<String>),
    Convert(ConvertOptions),
    Store(StoreOptions),
}

impl Command {
    pub fn preserve<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Command::Preserve(names.into_iter().map(Into::into).collect())
    }

    /// Top-level key in the command object
    pub fn key(&self) -> &'static str {
        match self {
            Command::Resize(_) => "resize",
            Command::Preserve(_) => "preserve",
            Command::Convert(_) => "convert",
            Command::Store(_) => "store",
        }
    }

    fn into_value(self) -> Result<Value> {
        let value = match self {
            Command::Resize(options) => serde_json::to_value(options),
            Command::Preserve(names) => serde_json::to_value(names),
            Command::Convert(options) => serde_json::to_value(options),
            Command::Store(options) => Ok(options.into_value()),
        };
        value.map_err(|e| {
            Way2enjoyError::Client(ErrorDetails::local(format!(
                "Failed to encode command: {e}"
            )))
        })
    }
}

/// What applying a command produced
#[derive(Debug, Clone)]
pub enum Step {
    /// Chaining may continue
    Source(Source),
    /// Store acknowledged; the chain ends here
    Stored(StoreResult),
}

/// Handle to a server-held image plus the commands applied to it so far.
///
/// Every value is immutable; commands return a new `Source` and leave the
/// receiver usable. The client the chain was started with stays attached to it.
#[derive(Debug, Clone)]
pub struct Source {
    client: Way2enjoyClient,
    location: String,
    commands: Map<String, Value>,
    fetched: Option<ImageResult>,
}

impl Source {
    /// Upload raw image bytes.
    pub async fn from_buffer(client: &Way2enjoyClient, buffer: impl Into<Bytes>) -> Result<Self> {
        let request = OperationRequest::post(urls::SHRINK_PATH, Payload::Raw(buffer.into()));
        Self::upload(client, &request).await
    }

    /// Upload the contents of a file.
    pub async fn from_file(client: &Way2enjoyClient, path: impl AsRef<Path>) -> Result<Self> {
        let buffer = storage::read(path).await?;
        Self::from_buffer(client, buffer).await
    }

    /// Let the service fetch the image from `url`.
    pub async fn from_url(client: &Way2enjoyClient, url: impl Into<String>) -> Result<Self> {
        let mut source = Map::new();
        source.insert("url".to_string(), Value::String(url.into()));
        let mut body = Map::new();
        body.insert("source".to_string(), Value::Object(source));

        let request = OperationRequest::post(urls::SHRINK_PATH, Payload::Json(body));
        Self::upload(client, &request).await
    }

    async fn upload(client: &Way2enjoyClient, request: &OperationRequest) -> Result<Self> {
        let response = client.request(request).await?;
        let location = required_location(&response)?;
        log::debug!("Uploaded source is at {location}");

        Ok(Self {
            client: client.clone(),
            location,
            commands: Map::new(),
            fetched: None,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Commands accumulated since the last new location
    pub fn commands(&self) -> &Map<String, Value> {
        &self.commands
    }

    pub fn client(&self) -> &Way2enjoyClient {
        &self.client
    }

    /// Apply one command: post the merged command object to the current
    /// location and turn the response into the next step.
    pub async fn apply(&self, command: Command) -> Result<Step> {
        match command {
            Command::Store(options) => Ok(Step::Stored(self.store(options).await?)),
            command => Ok(Step::Source(self.chain(command).await?)),
        }
    }

    pub async fn resize(&self, options: ResizeOptions) -> Result<Source> {
        self.chain(Command::Resize(options)).await
    }

    /// Keep the named metadata, e.g. `copyright`, `creation`, `location`.
    pub async fn preserve<I, S>(&self, names: I) -> Result<Source>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chain(Command::preserve(names)).await
    }

    pub async fn convert(&self, options: ConvertOptions) -> Result<Source> {
        self.chain(Command::Convert(options)).await
    }

    /// Save the image to third-party storage. Ends the chain.
    pub async fn store(&self, options: StoreOptions) -> Result<StoreResult> {
        let (_, response) = self.send(Command::Store(options)).await?;
        Ok(StoreResult::from_response(response))
    }

    async fn chain(&self, command: Command) -> Result<Source> {
        let (commands, response) = self.send(command).await?;
        Ok(self.next(commands, response))
    }

    async fn send(&self, command: Command) -> Result<(Map<String, Value>, OperationResponse)> {
        let key = command.key();
        let mut commands = self.commands.clone();
        commands.insert(key.to_string(), command.into_value()?);

        let request =
            OperationRequest::post(self.location.clone(), Payload::Json(commands.clone()));
        let response = self.client.request(&request).await?;
        Ok((commands, response))
    }

    fn next(&self, commands: Map<String, Value>, response: OperationResponse) -> Source {
        match response.location() {
            Some(location) => {
                log::debug!("Chain moved to {location}");
                Self {
                    client: self.client.clone(),
                    location: location.to_string(),
                    commands: Map::new(),
                    fetched: None,
                }
            }
            None => Self {
                client: self.client.clone(),
                location: self.location.clone(),
                commands,
                fetched: Some(response.into()),
            },
        }
    }

    /// The image with every accumulated command applied.
    pub async fn result(&self) -> Result<ImageResult> {
        if let Some(fetched) = &self.fetched {
            return Ok(fetched.clone());
        }

        let request = if self.commands.is_empty() {
            OperationRequest::get(self.location.clone())
        } else {
            OperationRequest::post(self.location.clone(), Payload::Json(self.commands.clone()))
        };
        Ok(self.client.request(&request).await?.into())
    }

    pub async fn to_buffer(&self) -> Result<Bytes> {
        Ok(self.result().await?.into_bytes())
    }

    pub async fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.result().await?.to_file(path).await
    }
}

fn required_location(response: &OperationResponse) -> Result<String> {
    response
        .location()
        .map(str::to_string)
        .ok_or_else(|| {
            Way2enjoyError::Server(ErrorDetails::new(
                "Missing Location header",
                Some(crate::constants::errors::MISSING_LOCATION_CODE.to_string()),
                Some(response.status),
            ))
        })
}
