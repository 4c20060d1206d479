use listview_records::Record;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct values offered by the type, location and category selectors.
///
/// Sorted; blank values are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub types: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

/// Headline numbers for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    /// Record count per non-blank type
    pub by_type: BTreeMap<String, usize>,
    pub distinct_locations: usize,
    /// Distinct companies, addresses or subjects
    pub distinct_labels: usize,
}

#[must_use]
pub fn filter_options(records: &[Record]) -> FilterOptions {
    let mut options = FilterOptions::default();
    for record in records {
        insert_trimmed(&mut options.types, &record.record_type);
        insert_trimmed(&mut options.locations, &record.location);
        insert_trimmed(&mut options.categories, &record.category);
    }
    options
}

#[must_use]
pub fn collection_stats(records: &[Record]) -> CollectionStats {
    let mut by_type = BTreeMap::new();
    let mut locations = BTreeSet::new();
    let mut labels = BTreeSet::new();
    for record in records {
        let record_type = record.record_type.trim();
        if !record_type.is_empty() {
            *by_type.entry(record_type.to_string()).or_insert(0) += 1;
        }
        insert_trimmed(&mut locations, &record.location);
        insert_trimmed(&mut labels, &record.secondary_label);
    }
    CollectionStats {
        total: records.len(),
        by_type,
        distinct_locations: locations.len(),
        distinct_labels: labels.len(),
    }
}

fn insert_trimmed(set: &mut BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}
