// Local filesystem adapter - Temp artifacts, destination copy and folder grants

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

const ARTIFACT_PREFIX: &str = "quickcut_";
const ARTIFACT_EXTENSION: &str = "mp4";
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Artifact store backed by local directories
pub struct LocalArtifactStore {
    temp_dir: PathBuf,
}

impl LocalArtifactStore {
    /// Use `temp_dir` for engine output, creating it if needed
    pub fn new(temp_dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let temp_dir = temp_dir.into();
        fs::create_dir_all(&temp_dir).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create temp directory {}: {}",
                temp_dir.display(),
                e
            ))
        })?;
        Ok(Self { temp_dir })
    }

    /// Store using the system temp directory
    pub fn in_system_temp() -> Result<Self, DomainError> {
        Self::new(std::env::temp_dir())
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }
}

/// Destination file name for an export started at `timestamp`
///
/// `attempt` > 0 adds a numeric suffix to step around collisions.
pub fn artifact_file_name(timestamp: DateTime<Local>, attempt: u32) -> String {
    let stamp = timestamp.format("%Y%m%d_%H%M%S_%3f");
    if attempt == 0 {
        format!("{}{}.{}", ARTIFACT_PREFIX, stamp, ARTIFACT_EXTENSION)
    } else {
        format!(
            "{}{}_{}.{}",
            ARTIFACT_PREFIX, stamp, attempt, ARTIFACT_EXTENSION
        )
    }
}

fn copy_into(source: &Path, destination: &Path, timestamp: DateTime<Local>) -> io::Result<PathBuf> {
    // hidden partial file; dropped (and removed) on any error below
    let mut partial = tempfile::Builder::new()
        .prefix(".quickcut_")
        .suffix(".partial")
        .tempfile_in(destination)?;

    let mut input = fs::File::open(source)?;
    io::copy(&mut input, partial.as_file_mut())?;
    partial.as_file().sync_all()?;

    let mut pending: NamedTempFile = partial;
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = destination.join(artifact_file_name(timestamp, attempt));
        match pending.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => pending = e.file,
            Err(e) => return Err(e.error),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free artifact name in destination",
    ))
}

fn blocking_join_error(e: tokio::task::JoinError) -> DomainError {
    DomainError::FsFail(format!("Filesystem task failed: {}", e))
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn create_temp_artifact(&self) -> Result<TempArtifact, DomainError> {
        let dir = self.temp_dir.clone();
        let path = tokio::task::spawn_blocking(move || -> io::Result<PathBuf> {
            let file = tempfile::Builder::new()
                .prefix(ARTIFACT_PREFIX)
                .suffix(".mp4")
                .tempfile_in(&dir)?;
            let (_, path) = file.keep().map_err(|e| e.error)?;
            Ok(path)
        })
        .await
        .map_err(blocking_join_error)?
        .map_err(|e| DomainError::FsFail(format!("Failed to create temp file: {}", e)))?;

        debug!(path = %path.display(), "temp artifact created");
        Ok(TempArtifact { path })
    }

    async fn persist(
        &self,
        temp: &TempArtifact,
        destination: &DestinationFolder,
    ) -> Result<ArtifactRef, DomainError> {
        if !destination.is_writable() {
            return Err(DomainError::PermissionDenied(format!(
                "No write access to {}",
                destination.path.display()
            )));
        }
        if !destination.path.is_dir() {
            return Err(DomainError::PermissionDenied(format!(
                "Destination folder is gone: {}",
                destination.path.display()
            )));
        }

        let source = temp.path.clone();
        let dest_dir = destination.path.clone();
        let timestamp = Local::now();
        let target = tokio::task::spawn_blocking(move || copy_into(&source, &dest_dir, timestamp))
            .await
            .map_err(blocking_join_error)?
            .map_err(|e| match e.kind() {
                io::ErrorKind::PermissionDenied => DomainError::PermissionDenied(e.to_string()),
                _ => DomainError::FsFail(format!("Failed to copy into destination: {}", e)),
            })?;

        info!(artifact = %target.display(), "artifact persisted");
        Ok(ArtifactRef::new(target))
    }

    async fn discard(&self, temp: &TempArtifact) -> Result<(), DomainError> {
        match tokio::fs::remove_file(&temp.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to delete {}: {}",
                temp.path.display(),
                e
            ))),
        }
    }
}

/// Folder picker that grants read/write on existing local directories
#[derive(Debug, Default)]
pub struct LocalFolderPicker;

impl LocalFolderPicker {
    pub fn new() -> Self {
        Self
    }

    fn can_write_to_directory(dir: &Path) -> bool {
        tempfile::Builder::new()
            .prefix(".quickcut_probe")
            .tempfile_in(dir)
            .is_ok()
    }
}

#[async_trait]
impl FolderPicker for LocalFolderPicker {
    async fn pick_folder(&self, location: &str) -> Option<DestinationFolder> {
        let dir = PathBuf::from(location);
        let checked = dir.clone();
        let writable = tokio::task::spawn_blocking(move || {
            checked.is_dir() && Self::can_write_to_directory(&checked)
        })
        .await
        .unwrap_or(false);

        if !writable {
            warn!(location, "destination folder is missing or not writable");
            return None;
        }
        Some(DestinationFolder::new(dir, FolderAccess::read_write()))
    }
}
