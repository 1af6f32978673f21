// Ports - Interface definitions for the external collaborators

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::{ColorMatrix, ExportJob};

/// Output the transform engine wrote for one job
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub path: PathBuf,
    pub elapsed: std::time::Duration,
}

/// Port for the media transform engine (decode, apply effects, encode)
///
/// One call is one submission. The returned `Result` is the single completion
/// signal: success or failure, never both, never neither.
#[async_trait]
pub trait TransformEngine: Send + Sync {
    async fn transform(
        &self,
        job: &ExportJob,
        output_path: &std::path::Path,
    ) -> Result<TransformOutput, DomainError>;
}

/// Temporary file the engine writes into before the destination copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempArtifact {
    pub path: PathBuf,
}

/// Port for temp artifacts and the copy into the user's destination
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Create a fresh, uniquely named temp file for the engine to write
    async fn create_temp_artifact(&self) -> Result<TempArtifact, DomainError>;

    /// Copy `temp` into `destination` under a fresh name. Nothing becomes
    /// visible in the destination unless the whole copy succeeded.
    async fn persist(
        &self,
        temp: &TempArtifact,
        destination: &DestinationFolder,
    ) -> Result<ArtifactRef, DomainError>;

    /// Remove the temp file
    async fn discard(&self, temp: &TempArtifact) -> Result<(), DomainError>;
}

/// Port for choosing the input video
#[async_trait]
pub trait SourcePicker: Send + Sync {
    /// `None` when the user cancelled or the source could not be read
    async fn pick_source(&self, location: &str) -> Option<SourceSelection>;
}

/// Port for choosing the destination folder
#[async_trait]
pub trait FolderPicker: Send + Sync {
    /// `None` unless a read/write grant was obtained
    async fn pick_folder(&self, location: &str) -> Option<DestinationFolder>;
}

/// Port for the system share action
#[async_trait]
pub trait SharePort: Send + Sync {
    async fn share(&self, artifact: &ArtifactRef) -> Result<(), DomainError>;
}

/// Port for transient user notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// What a screen wants to play
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub source: SourceRef,
    /// Restrict playback to this window; `None` plays the whole source
    pub clip: Option<TrimRange>,
    /// Color matrix overlaid on the picture; `None` shows it unfiltered
    pub filter: Option<ColorMatrix>,
}

/// Handle to an open media player, owned by exactly one screen
pub trait PlaybackHandle: Send {
    fn request(&self) -> &PlaybackRequest;

    /// Stop and dispose; must tolerate being called more than once
    fn release(&mut self);
}

/// Port for creating playback handles
pub trait PlaybackPort: Send + Sync {
    fn open(&self, request: PlaybackRequest) -> Result<Box<dyn PlaybackHandle>, DomainError>;
}
