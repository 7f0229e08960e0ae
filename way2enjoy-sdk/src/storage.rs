// ABOUTME: Byte-source helpers for reading images from and writing results to disk
// ABOUTME: Failures surface as Io errors, never as network error kinds

use bytes::Bytes;
use std::path::Path;

use crate::error::Way2enjoyError;
use crate::Result;

pub async fn read(path: impl AsRef<Path>) -> Result<Bytes> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|e| Way2enjoyError::io(path, e))
}

pub async fn write(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, data)
        .await
        .map_err(|e| Way2enjoyError::io(path, e))
}
