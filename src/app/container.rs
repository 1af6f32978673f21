use std::sync::Arc;

use crate::adapters::{
    CommandShareAdapter, EncoderSettings, FfmpegEngineAdapter, FfprobeSourceAdapter,
    HeadlessPlaybackAdapter, LocalArtifactStore, LocalFolderPicker, StderrNotifier,
};
use crate::app::{
    export_interactor::ExportInteractor, sequencer::ScreenSequencer,
    share_interactor::ShareInteractor, state_store::StateStore,
};
use crate::config::QuickCutConfig;
use crate::domain::errors::DomainError;
use crate::ports::{
    ArtifactStore, FolderPicker, Notifier, PlaybackPort, SharePort, SourcePicker, TransformEngine,
};

pub trait AppContainer: Send + Sync {
    fn store(&self) -> Arc<StateStore>;
    fn source_picker(&self) -> Arc<dyn SourcePicker>;
    fn folder_picker(&self) -> Arc<dyn FolderPicker>;
    fn export_interactor(&self) -> Arc<ExportInteractor>;
    fn share_interactor(&self) -> Arc<ShareInteractor>;
    /// Fresh sequencer on the Select screen, sharing this container's store
    fn sequencer(&self) -> ScreenSequencer;
}

pub struct DefaultAppContainer {
    store: Arc<StateStore>,
    source_picker: Arc<dyn SourcePicker>,
    folder_picker: Arc<dyn FolderPicker>,
    playback: Arc<dyn PlaybackPort>,
    export_interactor: Arc<ExportInteractor>,
    share_interactor: Arc<ShareInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &QuickCutConfig) -> Result<Self, DomainError> {
        let artifacts = match &config.temp_dir {
            Some(dir) => LocalArtifactStore::new(dir.clone())?,
            None => LocalArtifactStore::in_system_temp()?,
        };

        Ok(Self::with_ports(
            Arc::new(FfprobeSourceAdapter::new(config.ffprobe_path.clone())),
            Arc::new(LocalFolderPicker::new()),
            Arc::new(HeadlessPlaybackAdapter::new()),
            Arc::new(FfmpegEngineAdapter::new(EncoderSettings::from_config(config))),
            Arc::new(artifacts),
            Arc::new(CommandShareAdapter::new(config.share_command.clone())),
            Arc::new(StderrNotifier::new()),
        ))
    }

    /// Wire the application around explicit ports
    pub fn with_ports(
        source_picker: Arc<dyn SourcePicker>,
        folder_picker: Arc<dyn FolderPicker>,
        playback: Arc<dyn PlaybackPort>,
        engine: Arc<dyn TransformEngine>,
        artifacts: Arc<dyn ArtifactStore>,
        share: Arc<dyn SharePort>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = Arc::new(StateStore::new());

        let export_interactor = Arc::new(ExportInteractor::new(
            Arc::clone(&store),
            engine,
            artifacts,
        ));
        let share_interactor = Arc::new(ShareInteractor::new(Arc::clone(&store), share, notifier));

        Self {
            store,
            source_picker,
            folder_picker,
            playback,
            export_interactor,
            share_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn store(&self) -> Arc<StateStore> {
        Arc::clone(&self.store)
    }

    fn source_picker(&self) -> Arc<dyn SourcePicker> {
        Arc::clone(&self.source_picker)
    }

    fn folder_picker(&self) -> Arc<dyn FolderPicker> {
        Arc::clone(&self.folder_picker)
    }

    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }

    fn share_interactor(&self) -> Arc<ShareInteractor> {
        Arc::clone(&self.share_interactor)
    }

    fn sequencer(&self) -> ScreenSequencer {
        ScreenSequencer::new(Arc::clone(&self.store), Arc::clone(&self.playback))
    }
}
