// Domain models - Editing session and the values it is built from

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::TrimRules;

/// Opaque reference to the selected input video
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the source picker hands back: the source plus its total length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSelection {
    pub source: SourceRef,
    pub duration_ms: u64,
}

impl SourceSelection {
    pub fn new(source: SourceRef, duration_ms: u64) -> Self {
        Self {
            source,
            duration_ms,
        }
    }
}

/// Millisecond window of the source, start inclusive, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrimRange {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl TrimRange {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Whole-source range
    pub fn full(duration_ms: u64) -> Self {
        Self {
            start_ms: 0,
            end_ms: duration_ms,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Fixed set of color filter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoFilter {
    #[default]
    None,
    BlackWhite,
    Dark,
    Sepia,
    Inverted,
    HighContrast,
    Warm,
}

impl VideoFilter {
    /// All presets in display order
    pub const ALL: [VideoFilter; 7] = [
        VideoFilter::None,
        VideoFilter::BlackWhite,
        VideoFilter::Dark,
        VideoFilter::Sepia,
        VideoFilter::Inverted,
        VideoFilter::HighContrast,
        VideoFilter::Warm,
    ];

    /// Stable identifier used on the command line and in serialized output
    pub fn slug(&self) -> &'static str {
        match self {
            VideoFilter::None => "none",
            VideoFilter::BlackWhite => "black-white",
            VideoFilter::Dark => "dark",
            VideoFilter::Sepia => "sepia",
            VideoFilter::Inverted => "inverted",
            VideoFilter::HighContrast => "high-contrast",
            VideoFilter::Warm => "warm",
        }
    }

    /// Parse filter name (case insensitive, a few aliases accepted)
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let normalized = name.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "none" | "original" => Ok(VideoFilter::None),
            "black-white" | "black&white" | "blackwhite" | "bw" | "grayscale" => {
                Ok(VideoFilter::BlackWhite)
            }
            "dark" => Ok(VideoFilter::Dark),
            "sepia" => Ok(VideoFilter::Sepia),
            "inverted" | "invert" => Ok(VideoFilter::Inverted),
            "high-contrast" | "highcontrast" | "contrast" => Ok(VideoFilter::HighContrast),
            "warm" => Ok(VideoFilter::Warm),
            _ => Err(DomainError::BadArgs(format!(
                "Unknown filter: {}. Valid filters: none, black-white, dark, sepia, inverted, high-contrast, warm",
                name
            ))),
        }
    }
}

impl FromStr for VideoFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Reference to an exported file in the destination folder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(PathBuf);

impl ArtifactRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Access the user granted on a destination folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderAccess {
    pub read: bool,
    pub write: bool,
}

impl FolderAccess {
    pub fn read_write() -> Self {
        Self {
            read: true,
            write: true,
        }
    }
}

/// User-granted, write-capable destination folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationFolder {
    pub path: PathBuf,
    pub access: FolderAccess,
}

impl DestinationFolder {
    pub fn new(path: impl Into<PathBuf>, access: FolderAccess) -> Self {
        Self {
            path: path.into(),
            access,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.access.write
    }
}

/// Export progress and outcome as seen by observers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExportStatus {
    #[default]
    Idle,
    Exporting {
        progress: f32,
    },
    Succeeded {
        artifact: ArtifactRef,
    },
    Failed,
}

impl ExportStatus {
    pub fn is_exporting(&self) -> bool {
        matches!(self, ExportStatus::Exporting { .. })
    }

    pub fn artifact(&self) -> Option<&ArtifactRef> {
        match self {
            ExportStatus::Succeeded { artifact } => Some(artifact),
            _ => None,
        }
    }
}

/// Terminal result of one export attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportCompletion {
    Succeeded(ArtifactRef),
    Failed,
}

/// Every mutation the session accepts
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SelectSource(SourceSelection),
    SetTrim { start_ms: u64, end_ms: u64 },
    SetTrimStart(u64),
    SetTrimEnd(u64),
    SetFilter(VideoFilter),
    BeginExport,
    CompleteExport(ExportCompletion),
    Reset,
}

/// The current editing task
///
/// A `Session` is a value: [`Session::reduce`] never mutates, it returns the
/// next session. Rejected edits return an identical copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    source: Option<SourceRef>,
    source_duration_ms: u64,
    trim: TrimRange,
    selected_filter: VideoFilter,
    export_status: ExportStatus,
}

impl Session {
    /// Empty session, as at application start
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&SourceRef> {
        self.source.as_ref()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn source_duration_ms(&self) -> u64 {
        self.source_duration_ms
    }

    pub fn trim(&self) -> TrimRange {
        self.trim
    }

    pub fn trim_start_ms(&self) -> u64 {
        self.trim.start_ms
    }

    pub fn trim_end_ms(&self) -> u64 {
        self.trim.end_ms
    }

    pub fn selected_filter(&self) -> VideoFilter {
        self.selected_filter
    }

    pub fn export_status(&self) -> &ExportStatus {
        &self.export_status
    }

    pub fn artifact(&self) -> Option<&ArtifactRef> {
        self.export_status.artifact()
    }

    /// Compute the session that results from `event`
    pub fn reduce(&self, event: &SessionEvent) -> Session {
        match event {
            SessionEvent::SelectSource(selection) => self.with_source(selection),
            SessionEvent::SetTrim { start_ms, end_ms } => {
                self.with_trim(TrimRange::new(*start_ms, *end_ms))
            }
            SessionEvent::SetTrimStart(start_ms) => {
                self.with_trim(TrimRange::new(*start_ms, self.trim.end_ms))
            }
            SessionEvent::SetTrimEnd(end_ms) => {
                self.with_trim(TrimRange::new(self.trim.start_ms, *end_ms))
            }
            SessionEvent::SetFilter(filter) => {
                if self.source.is_none() {
                    return self.clone();
                }
                Session {
                    selected_filter: *filter,
                    ..self.clone()
                }
            }
            SessionEvent::BeginExport => {
                if self.source.is_none() || self.export_status.is_exporting() {
                    return self.clone();
                }
                Session {
                    export_status: ExportStatus::Exporting { progress: 0.0 },
                    ..self.clone()
                }
            }
            SessionEvent::CompleteExport(completion) => {
                if !self.export_status.is_exporting() {
                    return self.clone();
                }
                let export_status = match completion {
                    ExportCompletion::Succeeded(artifact) => ExportStatus::Succeeded {
                        artifact: artifact.clone(),
                    },
                    ExportCompletion::Failed => ExportStatus::Failed,
                };
                Session {
                    export_status,
                    ..self.clone()
                }
            }
            SessionEvent::Reset => Session::empty(),
        }
    }

    fn with_source(&self, selection: &SourceSelection) -> Session {
        // Zero-length media counts as no selection
        if selection.duration_ms == 0 {
            return self.clone();
        }
        Session {
            source: Some(selection.source.clone()),
            source_duration_ms: selection.duration_ms,
            trim: TrimRange::full(selection.duration_ms),
            selected_filter: VideoFilter::None,
            export_status: ExportStatus::Idle,
        }
    }

    fn with_trim(&self, candidate: TrimRange) -> Session {
        if self.source.is_none() || !TrimRules::is_valid(&candidate, self.source_duration_ms) {
            return self.clone();
        }
        Session {
            trim: candidate,
            ..self.clone()
        }
    }
}
