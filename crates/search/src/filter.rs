use crate::ordering::OrderingRule;
use listview_protocol::FilterState;
use listview_records::{fold_case, Record};

/// A [`FilterState`] prepared for matching: trimmed, lower-cased, empty values dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledFilters {
    search: Option<String>,
    record_type: Option<String>,
    location: Option<String>,
    category: Option<String>,
}

impl CompiledFilters {
    #[must_use]
    pub fn new(state: &FilterState) -> Self {
        Self {
            search: normalize_needle(&state.search),
            record_type: normalize_needle(&state.record_type),
            location: normalize_needle(&state.location),
            category: normalize_needle(&state.category),
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.search.is_some()
            || self.record_type.is_some()
            || self.location.is_some()
            || self.category.is_some()
    }

    /// All active predicates AND-ed together.
    ///
    /// Type and category match exactly, location and search by substring.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(record_type) = &self.record_type {
            if !equals_folded(&record.record_type, record_type) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !fold_case(&record.location).contains(location.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !equals_folded(&record.category, category) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !record.searchable_text.contains(search.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Positions (into `records`) of the filtered view, in display order.
#[must_use]
pub fn filter_indices(
    records: &[Record],
    filters: &FilterState,
    ordering: OrderingRule,
) -> Vec<usize> {
    let compiled = CompiledFilters::new(filters);
    let mut indices: Vec<usize> = if compiled.is_active() {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| compiled.matches(record))
            .map(|(idx, _)| idx)
            .collect()
    } else {
        (0..records.len()).collect()
    };
    ordering.apply(records, &mut indices);
    log::debug!(
        "Filtered {} of {} records (ordering={})",
        indices.len(),
        records.len(),
        ordering.as_str()
    );
    indices
}

/// The filtered, ordered view. Pure: same inputs, same output.
#[must_use]
pub fn compute_filtered<'a>(
    records: &'a [Record],
    filters: &FilterState,
    ordering: OrderingRule,
) -> Vec<&'a Record> {
    filter_indices(records, filters, ordering)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

fn normalize_needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| fold_case(trimmed))
}

fn equals_folded(value: &str, needle: &str) -> bool {
    fold_case(value.trim()) == needle
}

#[cfg(test)]
mod tests {
    use super::*;
    use listview_protocol::FilterKey;
    use listview_records::{CollectionKind, RecordCollection};
    use proptest::prelude::*;
    use serde_json::json;

    fn collection() -> RecordCollection {
        RecordCollection::from_document(
            &json!([
                {"id": 1, "title": "Welding Apprentice", "company": "Nnewi Motors", "location": "Nnewi", "category": "Manufacturing", "type": "Training", "date_posted": "2025-02-01"},
                {"id": 2, "title": "Frontend Developer", "company": "Awka Digital", "location": "Awka, Anambra", "category": "IT", "type": "Full-time", "date_posted": "2025-03-01"},
                {"id": 3, "title": "Nursing Assistant", "company": "Onitsha General", "location": "Onitsha", "category": "Health", "type": "Training", "date_posted": "2025-01-15"},
                {"id": 4, "title": "Data Entry Clerk", "company": "Awka Records", "location": "Awka", "category": "Admin", "type": "Part-time"},
                {"id": 5, "title": "Solar Installer", "company": "Sunline", "location": "Enugu", "category": "Energy", "type": "Training", "date_posted": "2025-03-10"}
            ]),
            CollectionKind::Opportunities,
        )
        .unwrap()
    }

    fn ids(view: &[&Record]) -> Vec<String> {
        view.iter().map(|r| r.id.to_string()).collect()
    }

    fn state(pairs: &[(FilterKey, &str)]) -> FilterState {
        let mut state = FilterState::default();
        for (key, value) in pairs {
            state.set(*key, value);
        }
        state
    }

    #[test]
    fn type_filter_selects_three_training_records() {
        let collection = collection();
        let view = compute_filtered(
            collection.records(),
            &state(&[(FilterKey::Type, "Training")]),
            OrderingRule::DatePostedDesc,
        );
        assert_eq!(view.len(), 3);
        assert_eq!(ids(&view), vec!["5", "1", "3"]);
    }

    #[test]
    fn type_and_category_are_exact_but_case_insensitive() {
        let collection = collection();
        let records = collection.records();
        let exact = state(&[(FilterKey::Type, "training")]);
        assert_eq!(compute_filtered(records, &exact, OrderingRule::Insertion).len(), 3);
        let partial = state(&[(FilterKey::Category, "Heal")]);
        assert!(compute_filtered(records, &partial, OrderingRule::Insertion).is_empty());
    }

    #[test]
    fn location_matches_by_substring() {
        let collection = collection();
        let view = compute_filtered(
            collection.records(),
            &state(&[(FilterKey::Location, " awka ")]),
            OrderingRule::Insertion,
        );
        assert_eq!(ids(&view), vec!["2", "4"]);
    }

    #[test]
    fn predicates_are_anded() {
        let collection = collection();
        let view = compute_filtered(
            collection.records(),
            &state(&[(FilterKey::Location, "awka"), (FilterKey::Search, "clerk")]),
            OrderingRule::Insertion,
        );
        assert_eq!(ids(&view), vec!["4"]);
    }

    #[test]
    fn search_covers_company_and_description() {
        let collection = collection();
        let view = compute_filtered(
            collection.records(),
            &state(&[(FilterKey::Search, "SUNLINE")]),
            OrderingRule::Insertion,
        );
        assert_eq!(ids(&view), vec!["5"]);
    }

    #[test]
    fn undated_records_sort_last_in_source_order() {
        let collection = collection();
        let view = compute_filtered(
            collection.records(),
            &FilterState::default(),
            OrderingRule::DatePostedDesc,
        );
        assert_eq!(ids(&view), vec!["5", "2", "1", "3", "4"]);
    }

    #[test]
    fn final_sigma_in_titles_is_still_found() {
        let collection = RecordCollection::from_document(
            &json!([{"id": 1, "title": "ΟΔΟΣ ΑΣ", "location": "ΑΘΗΝΑΣ"}]),
            CollectionKind::Opportunities,
        )
        .unwrap();
        for needle in ["Σ", "ΑΣ", "οσ"] {
            let view = compute_filtered(
                collection.records(),
                &state(&[(FilterKey::Search, needle)]),
                OrderingRule::Insertion,
            );
            assert_eq!(ids(&view), vec!["1"], "needle {needle}");
        }
        let by_location = compute_filtered(
            collection.records(),
            &state(&[(FilterKey::Location, "ΝΑΣ")]),
            OrderingRule::Insertion,
        );
        assert_eq!(by_location.len(), 1);
    }

    #[test]
    fn empty_collection_yields_empty_view() {
        let view = compute_filtered(&[], &state(&[(FilterKey::Search, "x")]), OrderingRule::Insertion);
        assert!(view.is_empty());
    }

    fn arb_records() -> impl Strategy<Value = Vec<Record>> {
        prop::collection::vec(
            (
                "[A-Za-z ]{1,16}",
                "[A-Za-z]{0,8}",
                prop::sample::select(vec!["Training", "Full-time", "Part-time", ""]),
                prop::option::of(1u32..28),
            ),
            0..24,
        )
        .prop_map(|rows| {
            let items: Vec<serde_json::Value> = rows
                .into_iter()
                .enumerate()
                .map(|(idx, (title, location, kind, day))| {
                    let mut item = json!({
                        "id": idx,
                        "title": title,
                        "location": location,
                        "type": kind
                    });
                    if let Some(day) = day {
                        item["date_posted"] = json!(format!("2025-04-{day:02}"));
                    }
                    item
                })
                .collect();
            RecordCollection::from_document(&json!(items), CollectionKind::Opportunities)
                .map(|c| c.records().to_vec())
                .unwrap_or_default()
        })
    }

    proptest! {
        #[test]
        fn proptest_empty_state_is_identity(records in arb_records()) {
            let view = compute_filtered(&records, &FilterState::default(), OrderingRule::Insertion);
            let expected: Vec<&Record> = records.iter().collect();
            prop_assert_eq!(view, expected);
        }

        #[test]
        fn proptest_title_substring_is_found(records in arb_records(), pick in any::<prop::sample::Index>(), start in 0usize..8, len in 1usize..6) {
            prop_assume!(!records.is_empty());
            let target = &records[pick.index(records.len())];
            let chars: Vec<char> = target.title.chars().collect();
            let start = start.min(chars.len().saturating_sub(1));
            let end = (start + len).min(chars.len());
            let needle: String = chars[start..end].iter().collect();
            prop_assume!(!needle.trim().is_empty());

            let view = compute_filtered(&records, &state(&[(FilterKey::Search, &needle)]), OrderingRule::DatePostedDesc);
            prop_assert!(view.iter().any(|r| r.id == target.id));
        }

        #[test]
        fn proptest_filtering_is_idempotent(records in arb_records(), kind in prop::sample::select(vec!["Training", "Full-time", ""]), loc in "[a-z]{0,2}") {
            let filters = state(&[(FilterKey::Type, kind), (FilterKey::Location, &loc)]);
            let first = filter_indices(&records, &filters, OrderingRule::DatePostedDesc);
            let second = filter_indices(&records, &filters, OrderingRule::DatePostedDesc);
            prop_assert_eq!(first, second);
        }
    }
}
