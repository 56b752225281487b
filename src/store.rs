//! Owner of the current view snapshot.

use crate::mvi::Reducer;
use crate::view::{ViewEvent, ViewReducer, ViewState};

/// Applies events to the view slice one at a time, in delivery order.
#[derive(Debug, Default)]
pub struct ViewStore {
    state: ViewState,
    dispatched: u64,
}

impl ViewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot instead of the initial one.
    pub fn with_state(state: ViewState) -> Self {
        Self {
            state,
            dispatched: 0,
        }
    }

    /// Run one event through the reducer and return the new snapshot.
    pub fn dispatch(&mut self, event: ViewEvent) -> &ViewState {
        let kind = event.kind().to_string();
        let previous = std::mem::take(&mut self.state);
        let next = ViewReducer::reduce(previous, event);
        self.dispatched += 1;

        tracing::debug!(
            kind = %kind,
            seq = self.dispatched,
            views = next.views.len(),
            formed_views = next.formed_views.len(),
            busy = next.is_busy(),
            sql_error = next.has_sql_error(),
            "View event applied"
        );

        self.state = next;
        &self.state
    }

    /// Return to the initial snapshot.
    pub fn reset(&mut self) -> &ViewState {
        self.dispatch(ViewEvent::ResetViewState)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    /// Number of events applied so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}
