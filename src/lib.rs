//! QuickCut video trimmer library
//!
//! Pick a source video, choose a trim window and a color filter preset, then
//! export the clip into a user-chosen folder. The session lives in a single
//! observable store; screens and the export pipeline only forward events to it.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use config::QuickCutConfig;
pub use domain::errors::DomainError;
pub use domain::model::{
    ArtifactRef, DestinationFolder, ExportStatus, Session, SessionEvent, SourceRef,
    SourceSelection, TrimRange, VideoFilter,
};
pub use domain::rules::{ColorMatrix, ColorTransform, ExportJob, FilterMapper};
pub use error::{QuickCutError, QuickCutResult};
