//! Command-line argument definitions

use clap::Args;

/// Trim and filter choices shared by `plan` and `export`
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Clip start (HH:MM:SS.ms, MM:SS.ms, or seconds); default: 0
    #[arg(short, long)]
    pub start: Option<String>,

    /// Clip end (HH:MM:SS.ms, MM:SS.ms, or seconds); default: end of video
    #[arg(short, long)]
    pub end: Option<String>,

    /// Filter preset (see `quickcut filters`)
    #[arg(short, long, default_value = "none")]
    pub filter: String,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Source duration; skips probing the file
    #[arg(long)]
    pub duration_ms: Option<u64>,

    #[command(flatten)]
    pub edit: EditArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: String,

    /// Destination folder for the exported clip
    #[arg(short, long)]
    pub dest: String,

    #[command(flatten)]
    pub edit: EditArgs,

    /// Run the configured share command on the result
    #[arg(long)]
    pub share: bool,
}
