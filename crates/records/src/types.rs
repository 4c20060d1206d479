use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title shown when a source record has none
pub const DEFAULT_TITLE: &str = "Untitled listing";

/// Description shown when a source record has none
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Salary shown when a source record has none
pub const DEFAULT_SALARY: &str = "Not specified";

/// Stable identifier of a record, as found in the source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Compares against a textual id, the form ids take in events and URLs.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            RecordId::Number(n) => raw.parse::<i64>().is_ok_and(|parsed| parsed == *n),
            RecordId::Text(text) => text == raw,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(text) => f.write_str(text),
        }
    }
}

/// Which kind of listing page a collection feeds.
///
/// The kind picks the field mapping used during normalisation, the wrapper key
/// accepted in object-shaped documents and the default ordering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    #[default]
    Opportunities,
    Members,
    Courses,
    Generic,
}

impl CollectionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Opportunities => "opportunities",
            CollectionKind::Members => "members",
            CollectionKind::Courses => "courses",
            CollectionKind::Generic => "generic",
        }
    }

    /// Wrapper keys tried, in order, when the document is an object.
    #[must_use]
    pub const fn wrapper_keys(self) -> &'static [&'static str] {
        match self {
            CollectionKind::Opportunities => &["opportunities", "records", "items", "data"],
            CollectionKind::Members => &["members", "records", "items", "data"],
            CollectionKind::Courses => &["courses", "records", "items", "data"],
            CollectionKind::Generic => &[
                "records",
                "items",
                "data",
                "members",
                "opportunities",
                "courses",
            ],
        }
    }

    /// Whether the source carries a posting date worth ordering by.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, CollectionKind::Opportunities | CollectionKind::Generic)
    }

    /// Noun pair used in result counters.
    #[must_use]
    pub const fn nouns(self) -> (&'static str, &'static str) {
        match self {
            CollectionKind::Opportunities => ("opportunity", "opportunities"),
            CollectionKind::Members => ("member", "members"),
            CollectionKind::Courses => ("course", "courses"),
            CollectionKind::Generic => ("record", "records"),
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "opportunities" | "jobs" => Ok(CollectionKind::Opportunities),
            "members" | "directory" => Ok(CollectionKind::Members),
            "courses" => Ok(CollectionKind::Courses),
            "generic" | "records" => Ok(CollectionKind::Generic),
            other => Err(format!("unknown collection kind: {other}")),
        }
    }
}

/// One listing, normalised into a fixed shape at ingestion.
///
/// Matching fields are plain strings; an absent source field is stored as an
/// empty string so predicates never have to special-case it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    /// Company, address or subject depending on the collection kind
    pub secondary_label: String,
    pub location: String,
    pub category: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// Lower-cased haystack for free-text search
    pub searchable_text: String,
    pub date_posted: Option<NaiveDateTime>,
    pub details: RecordDetails,
}

/// Display-only fields. Never consulted by the filter engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordDetails {
    pub description: String,
    pub salary: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Free-form labels (course technologies, member tags)
    #[serde(default)]
    pub tags: Vec<String>,
    pub apply_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub deadline: Option<NaiveDateTime>,
}

impl Default for RecordDetails {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            salary: DEFAULT_SALARY.to_string(),
            requirements: Vec::new(),
            benefits: Vec::new(),
            tags: Vec::new(),
            apply_url: None,
            website: None,
            phone: None,
            deadline: None,
        }
    }
}

impl Record {
    /// Builds the search haystack from the matching fields plus the description.
    #[must_use]
    pub fn build_searchable_text(
        title: &str,
        secondary_label: &str,
        location: &str,
        category: &str,
        record_type: &str,
        description: &str,
    ) -> String {
        let text = [title, secondary_label, location, category, record_type, description]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        fold_case(&text)
    }
}

/// Lower-cases one character at a time.
///
/// Unlike [`str::to_lowercase`] the mapping ignores context (a final sigma
/// folds like any other), so a folded substring is always a substring of the
/// folded text.
#[must_use]
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_match_textual_lookups() {
        assert!(RecordId::Number(7).matches("7"));
        assert!(RecordId::Number(7).matches(" 7 "));
        assert!(!RecordId::Number(7).matches("07x"));
        assert!(RecordId::Text("opp-7".to_string()).matches("opp-7"));
        assert_eq!(RecordId::Number(42).to_string(), "42");
    }

    #[test]
    fn searchable_text_is_lowercase_and_skips_blanks() {
        let text = Record::build_searchable_text("Nurse", "  ", "Awka", "Health", "Full-time", "");
        assert_eq!(text, "nurse awka health full-time");
    }

    #[test]
    fn folding_ignores_word_position() {
        assert_eq!(fold_case("ΑΣ"), "ασ");
        assert_eq!(fold_case("Σ"), "σ");
        let text = Record::build_searchable_text("ΟΔΟΣ Awka", "", "", "", "", "");
        assert!(text.contains(&fold_case("ΟΔΟΣ")));
    }

    #[test]
    fn kinds_parse_from_aliases() {
        assert_eq!("jobs".parse::<CollectionKind>(), Ok(CollectionKind::Opportunities));
        assert_eq!("Directory".parse::<CollectionKind>(), Ok(CollectionKind::Members));
        assert!("weather".parse::<CollectionKind>().is_err());
    }
}
