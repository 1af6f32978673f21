// Application layer - Session store, screen flow and use case interactors

pub mod container;
pub mod export_interactor;
pub mod sequencer;
pub mod share_interactor;
pub mod state_store;

// Re-export application types
pub use container::{AppContainer, DefaultAppContainer};
pub use export_interactor::{ExportInteractor, ExportOutcome};
pub use sequencer::{Screen, ScreenSequencer, Transition, UserAction};
pub use share_interactor::{ShareInteractor, ShareOutcome};
pub use state_store::{SessionReceiver, StateStore};
