use crate::error::SearchError;
use listview_records::{CollectionKind, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// How a filtered view is ordered. One rule per collection kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingRule {
    /// Most recent `date_posted` first; undated records follow in source order.
    DatePostedDesc,
    /// Source order, untouched. Directory-style data is never reordered.
    Insertion,
}

impl OrderingRule {
    #[must_use]
    pub const fn for_kind(kind: CollectionKind) -> Self {
        if kind.is_temporal() {
            OrderingRule::DatePostedDesc
        } else {
            OrderingRule::Insertion
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderingRule::DatePostedDesc => "date_posted_desc",
            OrderingRule::Insertion => "insertion",
        }
    }

    /// Reorders `indices` (positions into `records`). The sort is stable.
    pub fn apply(self, records: &[Record], indices: &mut [usize]) {
        match self {
            OrderingRule::Insertion => {}
            OrderingRule::DatePostedDesc => indices.sort_by(|&a, &b| {
                match (records[a].date_posted, records[b].date_posted) {
                    (Some(a), Some(b)) => b.cmp(&a),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }),
        }
    }
}

impl FromStr for OrderingRule {
    type Err = SearchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "date_posted_desc" | "newest" | "date" => Ok(OrderingRule::DatePostedDesc),
            "insertion" | "source" | "none" => Ok(OrderingRule::Insertion),
            other => Err(SearchError::UnknownOrdering(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_keep_insertion_order() {
        assert_eq!(OrderingRule::for_kind(CollectionKind::Members), OrderingRule::Insertion);
        assert_eq!(OrderingRule::for_kind(CollectionKind::Courses), OrderingRule::Insertion);
        assert_eq!(
            OrderingRule::for_kind(CollectionKind::Opportunities),
            OrderingRule::DatePostedDesc
        );
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("newest".parse::<OrderingRule>(), Ok(OrderingRule::DatePostedDesc));
        assert_eq!(" Source ".parse::<OrderingRule>(), Ok(OrderingRule::Insertion));
        assert_eq!(
            "random".parse::<OrderingRule>(),
            Err(SearchError::UnknownOrdering("random".to_string()))
        );
    }
}
