use crate::{FilterPatch, FilterState};
use url::{form_urlencoded, Url};

/// Reads filter overrides from a query string.
///
/// Accepts a bare query (`type=Training`), one with a leading `?`, or a full
/// URL. Values are percent-decoded; unknown parameters are dropped. A key that
/// is present with an empty value still overrides the persisted one.
#[must_use]
pub fn parse_query(raw: &str) -> FilterPatch {
    let raw = raw.trim();
    if let Ok(url) = Url::parse(raw) {
        let pairs = url.query_pairs().into_owned();
        return FilterPatch::from_pairs(pairs);
    }
    let query = raw.strip_prefix('?').unwrap_or(raw);
    let query = query.split('#').next().unwrap_or_default();
    FilterPatch::from_pairs(form_urlencoded::parse(query.as_bytes()).into_owned())
}

impl FilterState {
    /// Encodes the active filters, empty string when none are set.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.active() {
            serializer.append_pair(key.as_str(), value.trim());
        }
        serializer.finish()
    }
}
