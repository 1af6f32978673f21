// State store - Single-writer observable cell holding the editing session

use tokio::sync::watch;
use tracing::debug;

use crate::domain::model::*;

/// Receiver that always sees the latest session
pub type SessionReceiver = watch::Receiver<Session>;

/// Owner of the current [`Session`]
///
/// Every mutation replaces the whole session through [`Session::reduce`], so
/// observers never see a half-applied edit. Observers are woken only when the
/// session actually changed.
pub struct StateStore {
    tx: watch::Sender<Session>,
}

impl StateStore {
    /// Create a store holding an empty session
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::empty());
        Self { tx }
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    /// Observe future mutations
    pub fn subscribe(&self) -> SessionReceiver {
        self.tx.subscribe()
    }

    pub fn select_source(&self, selection: SourceSelection) -> bool {
        self.dispatch(SessionEvent::SelectSource(selection))
    }

    pub fn set_trim(&self, start_ms: u64, end_ms: u64) -> bool {
        self.dispatch(SessionEvent::SetTrim { start_ms, end_ms })
    }

    pub fn set_trim_start(&self, start_ms: u64) -> bool {
        self.dispatch(SessionEvent::SetTrimStart(start_ms))
    }

    pub fn set_trim_end(&self, end_ms: u64) -> bool {
        self.dispatch(SessionEvent::SetTrimEnd(end_ms))
    }

    pub fn set_filter(&self, filter: VideoFilter) -> bool {
        self.dispatch(SessionEvent::SetFilter(filter))
    }

    pub fn begin_export(&self) -> bool {
        self.dispatch(SessionEvent::BeginExport)
    }

    pub fn complete_export(&self, completion: ExportCompletion) -> bool {
        self.dispatch(SessionEvent::CompleteExport(completion))
    }

    pub fn reset(&self) -> bool {
        self.dispatch(SessionEvent::Reset)
    }

    /// Apply `event`; returns whether the session changed
    pub fn dispatch(&self, event: SessionEvent) -> bool {
        let changed = self.tx.send_if_modified(|session| {
            let next = session.reduce(&event);
            if next == *session {
                false
            } else {
                *session = next;
                true
            }
        });
        debug!(?event, changed, "session event");
        changed
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
