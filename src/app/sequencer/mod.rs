// Screen sequencer - Select / Edit / Export state machine driven by user actions

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::state_store::StateStore;
use crate::domain::model::*;
use crate::domain::rules::FilterMapper;
use crate::ports::{PlaybackHandle, PlaybackPort, PlaybackRequest};

/// Screens of the editing flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Select,
    Edit,
    Export,
}

/// Navigation actions a user can trigger
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Confirm the picked source on the Select screen
    ConfirmSource(SourceSelection),
    /// "Preview and export" on the Edit screen
    OpenExport,
    Back,
    /// Discard the session and start over from the Export screen
    NewProject,
}

/// Result of dispatching an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Screen, to: Screen },
    Ignored,
}

/// Resources a screen holds while it is current. Dropping the scope releases
/// them, whichever way the screen was left.
struct ScreenScope {
    screen: Screen,
    playback: Option<Box<dyn PlaybackHandle>>,
}

impl ScreenScope {
    fn bare(screen: Screen) -> Self {
        Self {
            screen,
            playback: None,
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        if let Some(mut handle) = self.playback.take() {
            debug!(screen = ?self.screen, source = %handle.request().source, "releasing playback");
            handle.release();
        }
    }
}

/// Finite state machine over the three screens
///
/// The sequencer holds no session data of its own; it forwards the mutation
/// an action carries to the [`StateStore`] and owns only screen-local
/// resources.
pub struct ScreenSequencer {
    store: Arc<StateStore>,
    playback: Arc<dyn PlaybackPort>,
    scope: ScreenScope,
}

impl ScreenSequencer {
    pub fn new(store: Arc<StateStore>, playback: Arc<dyn PlaybackPort>) -> Self {
        Self {
            store,
            playback,
            scope: ScreenScope::bare(Screen::Select),
        }
    }

    pub fn current(&self) -> Screen {
        self.scope.screen
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Whether the current screen holds a playback handle
    pub fn has_playback(&self) -> bool {
        self.scope.playback.is_some()
    }

    pub fn playback_request(&self) -> Option<&PlaybackRequest> {
        self.scope.playback.as_ref().map(|handle| handle.request())
    }

    /// Apply a user action; actions that make no sense on the current screen
    /// are ignored
    pub fn dispatch(&mut self, action: UserAction) -> Transition {
        let from = self.current();
        let to = match (from, action) {
            (Screen::Select, UserAction::ConfirmSource(selection)) => {
                if selection.duration_ms == 0 {
                    warn!(source = %selection.source, "ignoring selection without duration");
                    return Transition::Ignored;
                }
                self.store.select_source(selection);
                Screen::Edit
            }
            (Screen::Edit, UserAction::OpenExport) => Screen::Export,
            (Screen::Edit, UserAction::Back) => Screen::Select,
            (Screen::Export, UserAction::Back) => Screen::Edit,
            (Screen::Export, UserAction::NewProject) => {
                if self.store.snapshot().export_status().is_exporting() {
                    warn!("export in progress, not starting a new project");
                    return Transition::Ignored;
                }
                self.store.reset();
                Screen::Select
            }
            (screen, action) => {
                debug!(?screen, ?action, "action ignored");
                return Transition::Ignored;
            }
        };

        self.enter(to);
        info!(?from, ?to, "screen transition");
        Transition::Moved { from, to }
    }

    fn enter(&mut self, screen: Screen) {
        // old handle goes away before the new one is opened
        self.scope = ScreenScope::bare(screen);
        self.scope.playback = self.acquire_playback(screen);
    }

    fn acquire_playback(&self, screen: Screen) -> Option<Box<dyn PlaybackHandle>> {
        let session = self.store.snapshot();
        let source = session.source()?.clone();
        // the export screen previews the clip as it will be saved
        let (clip, filter) = match screen {
            Screen::Select => return None,
            Screen::Edit => (None, None),
            Screen::Export => (
                Some(session.trim()),
                FilterMapper::preview_matrix(session.selected_filter()),
            ),
        };

        match self.playback.open(PlaybackRequest {
            source,
            clip,
            filter,
        }) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(?screen, error = %e, "playback unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::rules::ColorMatrix;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Ledger {
        opened: Vec<PlaybackRequest>,
        released: usize,
    }

    struct FakeHandle {
        request: PlaybackRequest,
        ledger: Arc<Mutex<Ledger>>,
        released: bool,
    }

    impl PlaybackHandle for FakeHandle {
        fn request(&self) -> &PlaybackRequest {
            &self.request
        }

        fn release(&mut self) {
            if !self.released {
                self.released = true;
                self.ledger.lock().unwrap().released += 1;
            }
        }
    }

    #[derive(Default)]
    struct FakePlayback {
        ledger: Arc<Mutex<Ledger>>,
        fail: bool,
    }

    impl PlaybackPort for FakePlayback {
        fn open(&self, request: PlaybackRequest) -> Result<Box<dyn PlaybackHandle>, DomainError> {
            if self.fail {
                return Err(DomainError::PlaybackFail("no decoder".to_string()));
            }
            self.ledger.lock().unwrap().opened.push(request.clone());
            Ok(Box::new(FakeHandle {
                request,
                ledger: Arc::clone(&self.ledger),
                released: false,
            }))
        }
    }

    fn sequencer() -> (ScreenSequencer, Arc<Mutex<Ledger>>) {
        let playback = FakePlayback::default();
        let ledger = Arc::clone(&playback.ledger);
        let seq = ScreenSequencer::new(Arc::new(StateStore::new()), Arc::new(playback));
        (seq, ledger)
    }

    fn pick(duration_ms: u64) -> UserAction {
        UserAction::ConfirmSource(SourceSelection::new(SourceRef::new("v.mp4"), duration_ms))
    }

    #[test]
    fn test_initial_screen_is_select() {
        let (seq, _) = sequencer();
        assert_eq!(seq.current(), Screen::Select);
        assert!(!seq.has_playback());
    }

    #[test]
    fn test_full_walk() {
        let (mut seq, ledger) = sequencer();

        assert_eq!(
            seq.dispatch(pick(10_000)),
            Transition::Moved {
                from: Screen::Select,
                to: Screen::Edit
            }
        );
        assert_eq!(seq.store().snapshot().trim_end_ms(), 10_000);
        assert!(seq.has_playback());
        assert_eq!(seq.playback_request().unwrap().clip, None);
        assert_eq!(seq.playback_request().unwrap().filter, None);

        seq.store().set_trim(2000, 9000);
        seq.store().set_filter(VideoFilter::Sepia);
        seq.dispatch(UserAction::OpenExport);
        assert_eq!(seq.current(), Screen::Export);
        let request = seq.playback_request().unwrap();
        assert_eq!(request.clip, Some(TrimRange::new(2000, 9000)));
        assert_eq!(request.filter, Some(ColorMatrix::SEPIA));

        seq.dispatch(UserAction::Back);
        assert_eq!(seq.current(), Screen::Edit);
        assert_eq!(seq.playback_request().unwrap().filter, None);
        // session survives navigation
        assert_eq!(seq.store().snapshot().trim(), TrimRange::new(2000, 9000));

        seq.dispatch(UserAction::OpenExport);
        seq.dispatch(UserAction::NewProject);
        assert_eq!(seq.current(), Screen::Select);
        assert_eq!(seq.store().snapshot(), Session::empty());
        assert!(!seq.has_playback());

        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.opened.len(), 4);
        assert_eq!(ledger.released, 4);
    }

    #[test]
    fn test_edit_back_keeps_session() {
        let (mut seq, ledger) = sequencer();
        seq.dispatch(pick(8000));
        seq.store().set_filter(VideoFilter::Warm);
        seq.dispatch(UserAction::Back);
        assert_eq!(seq.current(), Screen::Select);
        assert_eq!(seq.store().snapshot().selected_filter(), VideoFilter::Warm);
        assert_eq!(ledger.lock().unwrap().released, 1);
    }

    #[test]
    fn test_invalid_actions_are_ignored() {
        let (mut seq, _) = sequencer();
        assert_eq!(seq.dispatch(UserAction::Back), Transition::Ignored);
        assert_eq!(seq.dispatch(UserAction::OpenExport), Transition::Ignored);
        assert_eq!(seq.dispatch(UserAction::NewProject), Transition::Ignored);
        assert_eq!(seq.dispatch(pick(0)), Transition::Ignored);
        assert_eq!(seq.current(), Screen::Select);

        seq.dispatch(pick(5000));
        assert_eq!(seq.dispatch(pick(7000)), Transition::Ignored);
        assert_eq!(seq.dispatch(UserAction::NewProject), Transition::Ignored);
        assert_eq!(seq.store().snapshot().source_duration_ms(), 5000);
    }

    #[test]
    fn test_new_project_blocked_while_exporting() {
        let (mut seq, _) = sequencer();
        seq.dispatch(pick(5000));
        seq.dispatch(UserAction::OpenExport);
        seq.store().begin_export();
        assert_eq!(seq.dispatch(UserAction::NewProject), Transition::Ignored);
        assert_eq!(seq.current(), Screen::Export);
    }

    #[test]
    fn test_drop_releases_playback() {
        let (mut seq, ledger) = sequencer();
        seq.dispatch(pick(5000));
        seq.dispatch(UserAction::OpenExport);
        drop(seq);
        let ledger = ledger.lock().unwrap();
        assert_eq!(ledger.opened.len(), 2);
        assert_eq!(ledger.released, 2);
    }

    #[test]
    fn test_playback_failure_still_enters_screen() {
        let playback = FakePlayback {
            fail: true,
            ..Default::default()
        };
        let mut seq = ScreenSequencer::new(Arc::new(StateStore::new()), Arc::new(playback));
        seq.dispatch(pick(5000));
        assert_eq!(seq.current(), Screen::Edit);
        assert!(!seq.has_playback());
    }
}
