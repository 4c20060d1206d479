use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use listview_protocol::serialize_json;
use listview_records::{CollectionKind, Record};
use listview_search::PageMode;
use listview_session::{RenderFrame, Renderer, ResultsFrame};
use serde_json::{json, Value};
use unicode_segmentation::UnicodeSegmentation;

/// Card descriptions are cut to this many graphemes.
const DESCRIPTION_PREVIEW: usize = 120;

/// Where rendered frames go.
#[derive(Debug)]
pub(crate) enum Sink {
    /// Print every frame as it is rendered.
    Stdout,
    /// Keep only the most recent frame; printed once the command finishes.
    Latest(Option<String>),
}

impl Sink {
    fn emit(&mut self, text: String) {
        match self {
            Sink::Stdout => {
                if let Err(err) = crate::print_stdout(&text) {
                    log::warn!("Failed to write frame: {err}");
                }
            }
            Sink::Latest(slot) => *slot = Some(text),
        }
    }

    fn take_latest(&mut self) -> Option<String> {
        match self {
            Sink::Stdout => None,
            Sink::Latest(slot) => slot.take(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Human-readable frames, one card per record
    Text,
    /// One JSON document per frame
    Json,
}

pub(crate) struct CliRenderer {
    format: OutputFormat,
    kind: CollectionKind,
    sink: Sink,
    now: NaiveDateTime,
}

impl CliRenderer {
    pub(crate) fn new(format: OutputFormat, kind: CollectionKind, sink: Sink) -> Self {
        Self {
            format,
            kind,
            sink,
            now: Local::now().naive_local(),
        }
    }

    /// Prints the retained frame of a [`Sink::Latest`] renderer.
    pub(crate) fn flush(&mut self) -> Result<()> {
        if let Some(text) = self.sink.take_latest() {
            crate::print_stdout(&text)?;
        }
        Ok(())
    }

    fn format_text(&self, frame: &RenderFrame<'_>) -> String {
        match frame {
            RenderFrame::Loading => format!("Loading {}...", self.kind.nouns().1),
            RenderFrame::Results(results) => format_results(results, self.now),
            RenderFrame::Detail(record) => format_detail(record, self.now),
            RenderFrame::NotFound { id } => format!("No {} with id '{id}'", self.kind.nouns().0),
        }
    }
}

impl Renderer for CliRenderer {
    fn render(&mut self, frame: RenderFrame<'_>) {
        let text = match self.format {
            OutputFormat::Text => self.format_text(&frame),
            OutputFormat::Json => match serialize_json(&frame_json(&frame)) {
                Ok(text) => text,
                Err(err) => {
                    log::error!("Failed to encode frame: {err}");
                    return;
                }
            },
        };
        self.sink.emit(text);
    }
}

pub(crate) fn frame_json(frame: &RenderFrame<'_>) -> Value {
    match frame {
        RenderFrame::Loading => json!({ "frame": "loading" }),
        RenderFrame::Results(results) => json!({
            "frame": "results",
            "kind": results.kind,
            "headline": results.headline(),
            "summary": results.summary,
            "page": results.page_number,
            "page_count": results.page_count,
            "has_more": results.has_more,
            "filters": results.filters.to_json_value(),
            "query": results.filters.to_query_string(),
            "error": results.load_error,
            "items": results.items,
        }),
        RenderFrame::Detail(record) => json!({ "frame": "detail", "record": record }),
        RenderFrame::NotFound { id } => json!({ "frame": "not_found", "id": id }),
    }
}

pub(crate) fn format_results(results: &ResultsFrame<'_>, now: NaiveDateTime) -> String {
    let mut out = String::new();
    if let Some(error) = results.load_error {
        out.push_str(&format!(
            "! Could not load {}: {error}\n",
            results.kind.nouns().1
        ));
    }
    out.push_str(&results.headline());
    out.push('\n');

    if results.filters.is_active() {
        let active: Vec<String> = results
            .filters
            .active()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        out.push_str(&format!("Filters: {}\n", active.join(", ")));
        out.push_str(&format!("Share: ?{}\n", results.filters.to_query_string()));
    }

    if results.is_empty() {
        if results.filters.is_active() {
            out.push_str("Try adjusting your search or clearing all filters.\n");
        }
        return out.trim_end().to_string();
    }

    let first = results.summary.first.max(1);
    for (offset, record) in results.items.iter().enumerate() {
        out.push('\n');
        out.push_str(&format_card(first + offset, record, now));
    }

    out.push('\n');
    match (results.mode, results.has_more) {
        (PageMode::Cumulative, true) => out.push_str("\n-- more available: type `more` --"),
        (PageMode::Discrete, _) => out.push_str(&format!(
            "\n-- page {} of {} --",
            results.page_number, results.page_count
        )),
        (PageMode::Cumulative, false) => {}
    }
    out.trim_end().to_string()
}

fn format_card(position: usize, record: &Record, now: NaiveDateTime) -> String {
    let mut card = format!("[{position}] {} (id {})\n", record.title, record.id);
    if !record.secondary_label.is_empty() {
        card.push_str(&format!("    {}\n", record.secondary_label));
    }
    let meta: Vec<&str> = [
        record.location.as_str(),
        record.record_type.as_str(),
        record.category.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();
    if !meta.is_empty() {
        card.push_str(&format!("    {}\n", meta.join(" | ")));
    }
    card.push_str(&format!(
        "    {}\n",
        truncate_graphemes(&record.details.description, DESCRIPTION_PREVIEW)
    ));
    if let Some(posted) = record.date_posted {
        card.push_str(&format!("    Posted {}\n", relative_date(posted, now)));
    }
    card
}

pub(crate) fn format_detail(record: &Record, now: NaiveDateTime) -> String {
    let mut out = format!("{}\n", record.title);
    if !record.secondary_label.is_empty() {
        out.push_str(&format!("{}\n", record.secondary_label));
    }
    let mut line = |label: &str, value: &str| {
        if !value.is_empty() {
            out.push_str(&format!("{label:<12}{value}\n"));
        }
    };
    line("Id", &record.id.to_string());
    line("Location", &record.location);
    line("Type", &record.record_type);
    line("Category", &record.category);
    line("Salary", &record.details.salary);
    if let Some(posted) = record.date_posted {
        line("Posted", &relative_date(posted, now));
    }
    if let Some(deadline) = record.details.deadline {
        line("Deadline", &deadline.format("%Y-%m-%d").to_string());
    }
    line("Website", record.details.website.as_deref().unwrap_or_default());
    line("Phone", record.details.phone.as_deref().unwrap_or_default());
    line("Apply", record.details.apply_url.as_deref().unwrap_or_default());

    out.push('\n');
    out.push_str(&record.details.description);
    out.push('\n');
    for (heading, items) in [
        ("Requirements", &record.details.requirements),
        ("Benefits", &record.details.benefits),
        ("Tags", &record.details.tags),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{heading}:\n"));
        for item in items {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out.trim_end().to_string()
}

/// "Today", "Yesterday", "N days ago", then the calendar date.
pub(crate) fn relative_date(date: NaiveDateTime, now: NaiveDateTime) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 86_400 {
        "Today".to_string()
    } else if seconds < 172_800 {
        "Yesterday".to_string()
    } else if seconds < 604_800 {
        format!("{} days ago", seconds / 86_400)
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Cuts `text` to at most `max` graphemes, marking the cut with "...".
pub(crate) fn truncate_graphemes(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let graphemes: Vec<&str> = flat.graphemes(true).collect();
    if graphemes.len() <= max {
        return flat;
    }
    format!("{}...", graphemes[..max].concat().trim_end())
}
