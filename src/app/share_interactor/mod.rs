// Share interactor - Hands the exported artifact to the system share action

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::state_store::StateStore;
use crate::domain::model::ArtifactRef;
use crate::ports::{Notifier, SharePort};

/// Shown when the share action could not be started
pub const SHARE_FAILED_MESSAGE: &str = "Could not open the share dialog";

/// Result of a share request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Nothing exported yet
    NothingToShare,
    Shared(ArtifactRef),
    /// Share action failed; the user was notified
    Notified,
}

/// Interactor for the share use case. Failures are cosmetic and never touch
/// the session.
pub struct ShareInteractor {
    store: Arc<StateStore>,
    share: Arc<dyn SharePort>,
    notifier: Arc<dyn Notifier>,
}

impl ShareInteractor {
    pub fn new(
        store: Arc<StateStore>,
        share: Arc<dyn SharePort>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            share,
            notifier,
        }
    }

    pub async fn share(&self) -> ShareOutcome {
        let artifact = match self.store.snapshot().artifact() {
            Some(artifact) => artifact.clone(),
            None => return ShareOutcome::NothingToShare,
        };

        match self.share.share(&artifact).await {
            Ok(()) => {
                info!(artifact = %artifact, "shared");
                ShareOutcome::Shared(artifact)
            }
            Err(e) => {
                warn!(artifact = %artifact, error = %e, "share failed");
                self.notifier.notify(SHARE_FAILED_MESSAGE);
                ShareOutcome::Notified
            }
        }
    }
}
