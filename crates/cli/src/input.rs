use anyhow::{anyhow, bail, Result};
use listview_protocol::FilterKey;
use listview_session::ViewEvent;

/// Parses one line of `browse` input.
///
/// Blank lines and `#` comments yield `None`. A filter command without a value
/// (`type`) clears that filter.
pub(crate) fn parse_event(line: &str) -> Result<Option<ViewEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    if let Some(key) = FilterKey::parse(command) {
        return Ok(Some(ViewEvent::input(key, rest)));
    }

    let event = match command.to_ascii_lowercase().as_str() {
        "more" | "next" => ViewEvent::LoadMore,
        "page" => {
            let number = rest
                .parse::<usize>()
                .map_err(|_| anyhow!("`page` expects a number, got '{rest}'"))?;
            ViewEvent::GoToPage(number)
        }
        "clear" => ViewEvent::ClearAll,
        "open" | "view" => {
            if rest.is_empty() {
                bail!("`open` expects a record id");
            }
            ViewEvent::Inspect { id: rest.to_string() }
        }
        "quit" | "exit" => ViewEvent::Shutdown,
        other => bail!("Unknown command '{other}'"),
    };
    Ok(Some(event))
}
