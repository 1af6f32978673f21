// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod notify_stderr;
pub mod playback_headless;
pub mod probe_ffprobe;
pub mod share_command;

// Re-export adapters
pub use exec_ffmpeg::{EncoderSettings, FfmpegEngineAdapter};
pub use fs_local::{LocalArtifactStore, LocalFolderPicker};
pub use notify_stderr::StderrNotifier;
pub use playback_headless::HeadlessPlaybackAdapter;
pub use probe_ffprobe::FfprobeSourceAdapter;
pub use share_command::CommandShareAdapter;
