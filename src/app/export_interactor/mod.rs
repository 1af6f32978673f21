// Export interactor - Turns the session into an export job and drives it to a terminal status

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::app::state_store::StateStore;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::ExportJob;
use crate::ports::*;

/// What one call to [`ExportInteractor::export`] did
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// No source selected or an export already pending; nothing happened
    Skipped,
    Succeeded(ArtifactRef),
    Failed(DomainError),
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Succeeded(_))
    }
}

/// Interactor for the export use case
pub struct ExportInteractor {
    store: Arc<StateStore>,
    engine: Arc<dyn TransformEngine>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ExportInteractor {
    /// Create new export interactor with injected ports
    pub fn new(
        store: Arc<StateStore>,
        engine: Arc<dyn TransformEngine>,
        artifacts: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            store,
            engine,
            artifacts,
        }
    }

    /// Export the current session into `destination`
    ///
    /// Every failure is folded into `ExportStatus::Failed`; nothing escapes
    /// as an error. The session is never left in `Exporting`.
    pub async fn export(&self, destination: &DestinationFolder) -> ExportOutcome {
        let session = self.store.snapshot();
        let job = match ExportJob::from_session(&session) {
            Some(job) => job,
            None => {
                debug!("export requested without a source");
                return ExportOutcome::Skipped;
            }
        };

        if !self.store.begin_export() {
            warn!("export already in progress");
            return ExportOutcome::Skipped;
        }

        info!(
            source = %job.source,
            start_ms = job.clip_range.start_ms,
            end_ms = job.clip_range.end_ms,
            filter = %session.selected_filter(),
            effects = job.effect_chain.len(),
            "starting export"
        );
        let started = Instant::now();

        match self.run(job, destination).await {
            Ok(artifact) => {
                info!(
                    artifact = %artifact,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "export succeeded"
                );
                self.store
                    .complete_export(ExportCompletion::Succeeded(artifact.clone()));
                ExportOutcome::Succeeded(artifact)
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.store.complete_export(ExportCompletion::Failed);
                ExportOutcome::Failed(e)
            }
        }
    }

    async fn run(
        &self,
        job: ExportJob,
        destination: &DestinationFolder,
    ) -> Result<ArtifactRef, DomainError> {
        if !destination.is_writable() {
            return Err(DomainError::PermissionDenied(format!(
                "No write grant for {}",
                destination.path.display()
            )));
        }

        let temp = self.artifacts.create_temp_artifact().await?;
        let result = self.transform_and_persist(job, &temp, destination).await;

        // temp file goes away on both paths; a failed removal never changes the outcome
        if let Err(e) = self.artifacts.discard(&temp).await {
            warn!(temp = %temp.path.display(), error = %e, "could not remove temp artifact");
        }

        result
    }

    async fn transform_and_persist(
        &self,
        job: ExportJob,
        temp: &TempArtifact,
        destination: &DestinationFolder,
    ) -> Result<ArtifactRef, DomainError> {
        let output = self.submit(job, temp.path.clone()).await?;
        debug!(
            output = %output.path.display(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "transform finished"
        );
        self.artifacts.persist(temp, destination).await
    }

    /// Run the engine off the caller's task; the oneshot resolves exactly once
    async fn submit(
        &self,
        job: ExportJob,
        output_path: PathBuf,
    ) -> Result<TransformOutput, DomainError> {
        let (tx, rx) = oneshot::channel();
        let engine = Arc::clone(&self.engine);

        tokio::spawn(async move {
            let result = engine.transform(&job, &output_path).await;
            let _ = tx.send(result);
        });

        rx.await.map_err(|_| DomainError::EngineDropped)?
    }
}
