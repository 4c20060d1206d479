use std::time::Duration;
use tokio::time::Instant;

/// Pending free-text input. Each keystroke restarts the single timer; the
/// latest text wins.
#[derive(Debug)]
pub(crate) struct SearchDebounce {
    quiet: Duration,
    pending: Option<String>,
    last_input: Option<Instant>,
}

impl SearchDebounce {
    pub(crate) const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_input: None,
        }
    }

    pub(crate) fn record(&mut self, text: String) {
        self.pending = Some(text);
        self.last_input = Some(Instant::now());
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_input.map(|last| last + self.quiet)
    }

    /// Takes the pending text, cancelling the timer.
    pub(crate) fn take(&mut self) -> Option<String> {
        self.last_input = None;
        self.pending.take()
    }

    pub(crate) fn cancel(&mut self) {
        self.take();
    }
}
