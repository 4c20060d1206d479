use crate::types::{CollectionKind, Record, RecordDetails, RecordId, DEFAULT_TITLE};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

struct FieldAliases {
    id: &'static [&'static str],
    title: &'static [&'static str],
    secondary_label: &'static [&'static str],
    location: &'static [&'static str],
    category: &'static [&'static str],
    record_type: &'static [&'static str],
    date_posted: &'static [&'static str],
}

const OPPORTUNITY_FIELDS: FieldAliases = FieldAliases {
    id: &["id", "slug"],
    title: &["title", "name"],
    secondary_label: &["company", "employer", "organization"],
    location: &["location", "city"],
    category: &["category"],
    record_type: &["type", "employment_type", "employmentType"],
    date_posted: &["date_posted", "datePosted", "posted"],
};

const MEMBER_FIELDS: FieldAliases = FieldAliases {
    id: &["id", "slug"],
    title: &["name", "title"],
    secondary_label: &["address"],
    location: &["address", "city", "location"],
    category: &["membershipLevel", "membership_level", "level", "category"],
    record_type: &["industry", "type"],
    date_posted: &[],
};

const COURSE_FIELDS: FieldAliases = FieldAliases {
    id: &["id"],
    title: &["title", "name"],
    secondary_label: &[],
    location: &["certificate"],
    category: &["subject", "category"],
    record_type: &["type"],
    date_posted: &[],
};

const GENERIC_FIELDS: FieldAliases = FieldAliases {
    id: &["id", "slug"],
    title: &["title", "name"],
    secondary_label: &[
        "secondaryLabel",
        "secondary_label",
        "company",
        "address",
        "subject",
    ],
    location: &["location", "city", "address"],
    category: &["category", "subject"],
    record_type: &["type"],
    date_posted: &["date_posted", "datePosted", "posted"],
};

const fn aliases_for(kind: CollectionKind) -> &'static FieldAliases {
    match kind {
        CollectionKind::Opportunities => &OPPORTUNITY_FIELDS,
        CollectionKind::Members => &MEMBER_FIELDS,
        CollectionKind::Courses => &COURSE_FIELDS,
        CollectionKind::Generic => &GENERIC_FIELDS,
    }
}

impl Record {
    /// Normalises one raw source item. Never fails: missing or mistyped fields
    /// fall back to defaults, and a non-object item becomes an all-default record.
    ///
    /// `position` is the zero-based index in the source, used for fallback ids.
    #[must_use]
    pub fn normalize(raw: &Value, position: usize, kind: CollectionKind) -> Self {
        let empty = Map::new();
        let obj = match raw.as_object() {
            Some(obj) => obj,
            None => {
                log::warn!("Record #{} is not an object; using defaults", position + 1);
                &empty
            }
        };
        let fields = aliases_for(kind);

        let id = first_id(obj, fields.id)
            .or_else(|| course_code(obj, kind).map(RecordId::Text))
            .unwrap_or_else(|| RecordId::Text(format!("record-{}", position + 1)));

        let title = first_text(obj, fields.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let secondary_label = match kind {
            CollectionKind::Courses => course_code(obj, kind).unwrap_or_default(),
            _ => first_text(obj, fields.secondary_label).unwrap_or_default(),
        };
        let location = first_text(obj, fields.location).unwrap_or_default();
        let category = first_text(obj, fields.category).unwrap_or_default();
        let record_type = match kind {
            CollectionKind::Courses => course_status(obj)
                .or_else(|| first_text(obj, fields.record_type))
                .unwrap_or_default(),
            _ => first_text(obj, fields.record_type).unwrap_or_default(),
        };
        let date_posted = first_text(obj, fields.date_posted).and_then(|raw| parse_date(&raw));

        let mut details = RecordDetails::default();
        if let Some(description) = first_text(obj, &["description", "summary"]) {
            details.description = description;
        }
        if let Some(salary) = first_text(obj, &["salary", "pay"]) {
            details.salary = salary;
        }
        details.requirements = text_list(obj, &["requirements"]);
        details.benefits = text_list(obj, &["benefits"]);
        details.tags = text_list(obj, &["technology", "tags"]);
        details.apply_url = first_text(obj, &["apply_url", "applyUrl"]);
        details.website = first_text(obj, &["website", "url"]);
        details.phone = first_text(obj, &["phone"]);
        details.deadline = first_text(obj, &["deadline"]).and_then(|raw| parse_date(&raw));

        let searchable_text = Self::build_searchable_text(
            &title,
            &secondary_label,
            &location,
            &category,
            &record_type,
            &details.description,
        );

        Self {
            id,
            title,
            secondary_label,
            location,
            category,
            record_type,
            searchable_text,
            date_posted,
            details,
        }
    }
}

/// Parses the date formats seen in listing feeds: RFC 3339, naive date-time and plain dates.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    log::debug!("Unrecognised date {raw:?}; treating record as undated");
    None
}

fn first_id(obj: &Map<String, Value>, keys: &[&str]) -> Option<RecordId> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_i64().map(RecordId::Number),
        Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s.trim().to_string())),
        _ => None,
    })
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| scalar_text(obj.get(*key)?))
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn text_list(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|key| match obj.get(*key)? {
            Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
            other => scalar_text(other).map(|single| vec![single]),
        })
        .unwrap_or_default()
}

fn course_code(obj: &Map<String, Value>, kind: CollectionKind) -> Option<String> {
    if kind != CollectionKind::Courses {
        return None;
    }
    let subject = first_text(obj, &["subject"])?;
    Some(match first_text(obj, &["number"]) {
        Some(number) => format!("{subject} {number}"),
        None => subject,
    })
}

fn course_status(obj: &Map<String, Value>) -> Option<String> {
    let completed = obj.get("completed")?.as_bool()?;
    Some(if completed { "Completed" } else { "In progress" }.to_string())
}
