use crate::collection::RecordCollection;
use crate::error::Result;
use crate::types::CollectionKind;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Supplies the raw collection document, once.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable origin for logs
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Value>;
}

/// Reads a JSON document from disk.
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

    async fn fetch(&self) -> Result<Value> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// GETs a JSON document over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Value> {
        let response = self
            .client
            .get(&self.url)
            .timeout(HTTP_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

/// A document already in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    document: Value,
}

impl InlineSource {
    #[must_use]
    pub const fn new(document: Value) -> Self {
        Self { document }
    }
}

#[async_trait]
impl RecordSource for InlineSource {
    fn describe(&self) -> String {
        "inline document".to_string()
    }

    async fn fetch(&self) -> Result<Value> {
        Ok(self.document.clone())
    }
}

/// Picks an HTTP source for `http://`/`https://` locations, a file source otherwise.
#[must_use]
pub fn source_for(location: &str) -> Box<dyn RecordSource> {
    let trimmed = location.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Box::new(HttpSource::new(trimmed))
    } else {
        Box::new(FileSource::new(trimmed))
    }
}

/// Result of the one-time load. `error` is set when the collection is a fallback.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub collection: RecordCollection,
    pub error: Option<String>,
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetches and decodes the collection. Never fails: a fetch or decode error is
/// logged and replaced by `fallback` (or an empty collection), and there is no retry.
pub async fn load_collection(
    source: &dyn RecordSource,
    kind: CollectionKind,
    fallback: Option<RecordCollection>,
) -> LoadOutcome {
    let loaded = match source.fetch().await {
        Ok(document) => RecordCollection::from_document(&document, kind),
        Err(err) => Err(err),
    };

    match loaded {
        Ok(collection) => {
            log::info!(
                "Loaded {} {} from {}",
                collection.len(),
                kind.nouns().1,
                source.describe()
            );
            LoadOutcome {
                collection,
                error: None,
            }
        }
        Err(err) => {
            log::error!("Failed to load {} from {}: {err}", kind.nouns().1, source.describe());
            LoadOutcome {
                collection: fallback.unwrap_or_else(|| RecordCollection::empty(kind)),
                error: Some(err.to_string()),
            }
        }
    }
}
