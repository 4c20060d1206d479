use crate::error::{RecordsError, Result};
use crate::types::{CollectionKind, Record, RecordId};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// The full candidate collection, loaded once and never written back.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordCollection {
    kind: CollectionKind,
    records: Vec<Record>,
}

impl RecordCollection {
    #[must_use]
    pub const fn empty(kind: CollectionKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Wraps already-normalised records, enforcing id uniqueness.
    #[must_use]
    pub fn from_records(kind: CollectionKind, mut records: Vec<Record>) -> Self {
        dedupe_ids(&mut records);
        Self { kind, records }
    }

    /// Decodes a source document.
    ///
    /// A top-level array is taken as the records themselves. A top-level object
    /// must carry one of the kind's wrapper keys holding an array; the first
    /// present key wins. Anything else is a malformed document.
    pub fn from_document(document: &Value, kind: CollectionKind) -> Result<Self> {
        let items = match document {
            Value::Array(items) => items,
            Value::Object(map) => kind
                .wrapper_keys()
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .ok_or_else(|| {
                    RecordsError::malformed(format!(
                        "object document has none of the array fields {:?}",
                        kind.wrapper_keys()
                    ))
                })?,
            other => {
                return Err(RecordsError::malformed(format!(
                    "expected an array or object, got {}",
                    json_type_name(other)
                )))
            }
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(position, raw)| Record::normalize(raw, position, kind))
            .collect();
        Ok(Self::from_records(kind, records))
    }

    #[must_use]
    pub const fn kind(&self) -> CollectionKind {
        self.kind
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by its textual id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id.matches(id))
    }
}

fn dedupe_ids(records: &mut [Record]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    for (position, record) in records.iter_mut().enumerate() {
        let key = record.id.to_string();
        if seen.insert(key.clone()) {
            continue;
        }
        let mut suffix = position + 1;
        let mut replacement = format!("{key}#{suffix}");
        while seen.contains(&replacement) {
            suffix += 1;
            replacement = format!("{key}#{suffix}");
        }
        log::warn!(
            "Duplicate record id {key:?} at #{}; renamed to {replacement:?}",
            position + 1
        );
        seen.insert(replacement.clone());
        record.id = RecordId::Text(replacement);
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
