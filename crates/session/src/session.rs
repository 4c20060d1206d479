use crate::controller::{ViewController, ViewState};
use crate::debounce::SearchDebounce;
use crate::events::ViewEvent;
use crate::render::Renderer;
use listview_protocol::{FilterKey, FilterPatch};
use listview_records::LoadOutcome;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::time;

/// Drives one view: waits for the load, routes events, debounces search text.
///
/// The controller should already be restored, so the `Loading` frame is on
/// screen before the first await.
///
/// Runs until a [`ViewEvent::Shutdown`] arrives, or until the event channel is
/// closed and the load has completed. Pending search text is applied before
/// returning.
pub async fn run_session<R, F>(
    controller: &mut ViewController<R>,
    load: F,
    mut events: mpsc::Receiver<ViewEvent>,
) -> ViewState
where
    R: Renderer,
    F: Future<Output = LoadOutcome>,
{
    let mut debounce = SearchDebounce::new(controller.config().search_debounce);
    let mut loaded = !controller.is_loading();
    let mut events_open = true;
    tokio::pin!(load);

    loop {
        if !events_open {
            flush_search(controller, &mut debounce);
            if loaded {
                break;
            }
        }

        let next_deadline = debounce.deadline();
        tokio::select! {
            outcome = &mut load, if !loaded => {
                loaded = true;
                if let Some(error) = &outcome.error {
                    log::warn!("Showing empty results after failed load: {error}");
                }
                controller.attach(outcome);
            }
            event = events.recv(), if events_open => {
                let Some(event) = event else {
                    log::debug!("Event channel closed");
                    events_open = false;
                    continue;
                };
                if !route_event(controller, &mut debounce, event) {
                    break;
                }
            }
            () = async {
                if let Some(deadline) = next_deadline {
                    time::sleep_until(deadline).await;
                }
            }, if next_deadline.is_some() => {
                flush_search(controller, &mut debounce);
            }
        }
    }

    flush_search(controller, &mut debounce);
    controller.view_state()
}

/// Returns `false` when the loop should stop.
fn route_event<R: Renderer>(
    controller: &mut ViewController<R>,
    debounce: &mut SearchDebounce,
    event: ViewEvent,
) -> bool {
    match event {
        ViewEvent::Input { key, value } if key.is_free_text() => {
            debounce.record(value);
        }
        ViewEvent::Input { key, value } => {
            // A selection applies at once and carries any unsettled search text with it.
            let mut patch = FilterPatch::new().with(key, value);
            if let Some(text) = debounce.take() {
                patch.set(FilterKey::Search, text);
            }
            controller.on_filter_change(&patch);
        }
        ViewEvent::ClearAll => {
            debounce.cancel();
            controller.clear_all();
        }
        ViewEvent::Shutdown => return false,
        other => controller.dispatch(other),
    }
    true
}

fn flush_search<R: Renderer>(controller: &mut ViewController<R>, debounce: &mut SearchDebounce) {
    if let Some(text) = debounce.take() {
        controller.on_filter_change(&FilterPatch::new().with(FilterKey::Search, text));
    }
}
