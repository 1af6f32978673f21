//! Command implementations

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::FfprobeSourceAdapter;
use crate::app::{
    AppContainer, DefaultAppContainer, ExportOutcome, ShareOutcome, StateStore, Transition,
    UserAction,
};
use crate::cli::args::{EditArgs, ExportArgs, PlanArgs, ProbeArgs};
use crate::config::QuickCutConfig;
use crate::domain::model::*;
use crate::domain::rules::{ExportJob, FilterMapper};
use crate::output::{describe_chain, filter_label, session_summary};
use crate::utils::time::{format_ms, parse_time_ms};

/// Execute the filters command
pub fn filters(config: &QuickCutConfig) -> Result<()> {
    for filter in VideoFilter::ALL {
        println!(
            "{:<14} {:<16} {}",
            filter.slug(),
            filter_label(filter, config.locale),
            describe_chain(&FilterMapper::effect_chain(filter))
        );
    }
    Ok(())
}

/// Execute the probe command
pub async fn probe(config: &QuickCutConfig, args: ProbeArgs) -> Result<()> {
    let adapter = FfprobeSourceAdapter::new(config.ffprobe_path.clone());
    let duration_ms = adapter
        .probe_duration_ms(&args.input)
        .await
        .with_context(|| format!("Failed to probe {}", args.input))?;

    println!("{}: {} ({} ms)", args.input, format_ms(duration_ms), duration_ms);
    Ok(())
}

#[derive(Serialize)]
struct PlanReport<'a> {
    session: &'a Session,
    job: &'a ExportJob,
}

/// Execute the plan command
pub async fn plan(config: &QuickCutConfig, args: PlanArgs) -> Result<()> {
    let duration_ms = match args.duration_ms {
        Some(ms) => ms,
        None => FfprobeSourceAdapter::new(config.ffprobe_path.clone())
            .probe_duration_ms(&args.input)
            .await
            .with_context(|| format!("Failed to probe {}", args.input))?,
    };

    let store = StateStore::new();
    if duration_ms == 0 {
        bail!("Source {} has no duration", args.input);
    }
    store.select_source(SourceSelection::new(SourceRef::new(&args.input), duration_ms));
    apply_edits(&store, &args.edit)?;

    let session = store.snapshot();
    let job = ExportJob::from_session(&session)
        .ok_or_else(|| anyhow!("No source selected"))?;

    if args.json {
        let report = PlanReport {
            session: &session,
            job: &job,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", session_summary(&session, config.locale));
        println!("Effects:  {}", describe_chain(&job.effect_chain));
    }
    Ok(())
}

/// Execute the export command
pub async fn export(config: &QuickCutConfig, args: ExportArgs) -> Result<()> {
    let container =
        DefaultAppContainer::new(config).context("Failed to set up export pipeline")?;
    let store = container.store();
    let mut sequencer = container.sequencer();

    let selection = container
        .source_picker()
        .pick_source(&args.input)
        .await
        .ok_or_else(|| anyhow!("Could not read source video: {}", args.input))?;

    if sequencer.dispatch(UserAction::ConfirmSource(selection)) == Transition::Ignored {
        bail!("Source {} cannot be edited", args.input);
    }
    apply_edits(&store, &args.edit)?;

    sequencer.dispatch(UserAction::OpenExport);
    info!(screen = ?sequencer.current(), "ready to export");
    println!("{}", session_summary(&store.snapshot(), config.locale));

    let destination = container
        .folder_picker()
        .pick_folder(&args.dest)
        .await
        .ok_or_else(|| anyhow!("Destination folder is missing or not writable: {}", args.dest))?;

    match container.export_interactor().export(&destination).await {
        ExportOutcome::Succeeded(artifact) => {
            println!("Saved {}", artifact);
        }
        ExportOutcome::Failed(e) => {
            return Err(anyhow!(e).context("Export failed"));
        }
        ExportOutcome::Skipped => bail!("Nothing to export"),
    }

    if args.share {
        match container.share_interactor().share().await {
            ShareOutcome::Shared(artifact) => info!(artifact = %artifact, "share started"),
            ShareOutcome::Notified => warn!("share did not start"),
            ShareOutcome::NothingToShare => warn!("nothing to share"),
        }
    }

    Ok(())
}

/// Apply trim and filter choices; a rejected trim is an error on the command line
fn apply_edits(store: &StateStore, edit: &EditArgs) -> Result<()> {
    let start = edit.start.as_deref().map(parse_time_ms).transpose()?;
    let end = edit.end.as_deref().map(parse_time_ms).transpose()?;

    match (start, end) {
        (Some(start_ms), Some(end_ms)) => {
            store.set_trim(start_ms, end_ms);
        }
        (Some(start_ms), None) => {
            store.set_trim_start(start_ms);
        }
        (None, Some(end_ms)) => {
            store.set_trim_end(end_ms);
        }
        (None, None) => {}
    }

    let trim = store.snapshot().trim();
    if start.is_some_and(|s| s != trim.start_ms) || end.is_some_and(|e| e != trim.end_ms) {
        bail!(
            "Trim range rejected: clips must be at least 1 second long and fit in the video ({})",
            format_ms(store.snapshot().source_duration_ms())
        );
    }

    let filter = VideoFilter::parse(&edit.filter)?;
    store.set_filter(filter);
    Ok(())
}
