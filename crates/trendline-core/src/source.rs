//! Where raw NDJSON text comes from.

use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

use crate::errors::SourceError;

/// An opaque provider of one stream's raw text.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable name used in load errors.
    fn describe(&self) -> String;

    async fn fetch_text(&self) -> anyhow::Result<String>;
}

/// NDJSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_text(&self) -> anyhow::Result<String> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(SourceError::from)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        String::from_utf8(bytes)
            .map_err(|_| SourceError::Encoding)
            .with_context(|| format!("failed to decode {}", self.path.display()))
    }
}

/// Text handed over by a collaborator, e.g. a body already fetched over HTTP.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    text: String,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch_text(&self) -> anyhow::Result<String> {
        Ok(self.text.clone())
    }
}
