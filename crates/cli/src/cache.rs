use async_trait::async_trait;
use listview_records::{
    CollectionKind, FileSource, RecordCollection, RecordSource, Result as RecordsResult,
};
use listview_store::PreferenceStore;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Prefix of cached-document keys in the preference store.
const CACHE_PREFIX: &str = "cache_";

fn cache_key(kind: CollectionKind) -> String {
    format!("{CACHE_PREFIX}{kind}")
}

/// Wraps a source and remembers the last document that decoded cleanly.
///
/// The cached value records its origin so a different source of the same
/// kind never serves it.
pub(crate) struct CachingSource {
    inner: Box<dyn RecordSource>,
    store: Arc<dyn PreferenceStore>,
    kind: CollectionKind,
    ttl: Duration,
}

impl CachingSource {
    pub(crate) fn new(
        inner: Box<dyn RecordSource>,
        store: Arc<dyn PreferenceStore>,
        kind: CollectionKind,
        ttl: Duration,
    ) -> Self {
        Self {
            inner,
            store,
            kind,
            ttl,
        }
    }

    /// The cached collection for this source, if one is stored and unexpired.
    pub(crate) fn cached(&self) -> Option<RecordCollection> {
        let entry = self.store.get(&cache_key(self.kind))?;
        if entry["source"].as_str() != Some(self.inner.describe().as_str()) {
            return None;
        }
        match RecordCollection::from_document(&entry["document"], self.kind) {
            Ok(collection) => Some(collection),
            Err(err) => {
                log::warn!("Ignoring cached {}: {err}", self.kind.nouns().1);
                None
            }
        }
    }
}

#[async_trait]
impl RecordSource for CachingSource {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    async fn fetch(&self) -> RecordsResult<Value> {
        let document = self.inner.fetch().await?;
        if !self.ttl.is_zero() && RecordCollection::from_document(&document, self.kind).is_ok() {
            let entry = json!({ "source": self.inner.describe(), "document": document });
            if !self.store.set_with_expiry(&cache_key(self.kind), entry, self.ttl) {
                log::debug!("Collection not cached; preference store unavailable");
            }
        }
        Ok(document)
    }
}

/// Picks the collection shown when the load fails: the cached document first,
/// then the configured fallback file.
pub(crate) async fn fallback_collection(
    source: &CachingSource,
    fallback_file: Option<&Path>,
) -> Option<RecordCollection> {
    if let Some(cached) = source.cached() {
        return Some(cached);
    }
    let path = fallback_file?;
    let decoded = FileSource::new(path)
        .fetch()
        .await
        .and_then(|document| RecordCollection::from_document(&document, source.kind));
    match decoded {
        Ok(collection) => Some(collection),
        Err(err) => {
            log::warn!("Fallback {} unusable: {err}", path.display());
            None
        }
    }
}
