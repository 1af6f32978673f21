// Headless playback adapter - Tracks player handles without rendering anything

use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Playback port for environments without a display
#[derive(Debug, Default)]
pub struct HeadlessPlaybackAdapter;

impl HeadlessPlaybackAdapter {
    pub fn new() -> Self {
        Self
    }
}

struct HeadlessHandle {
    request: PlaybackRequest,
    released: bool,
}

impl PlaybackHandle for HeadlessHandle {
    fn request(&self) -> &PlaybackRequest {
        &self.request
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            debug!(source = %self.request.source, "player released");
        }
    }
}

/// Mid-gray as the preview overlay would draw it; `None` when unfiltered
pub fn preview_tint(request: &PlaybackRequest) -> Option<[f32; 4]> {
    request
        .filter
        .map(|matrix| matrix.apply([128.0, 128.0, 128.0, 255.0]))
}

impl PlaybackPort for HeadlessPlaybackAdapter {
    fn open(&self, request: PlaybackRequest) -> Result<Box<dyn PlaybackHandle>, DomainError> {
        if request.source.as_str().is_empty() {
            return Err(DomainError::PlaybackFail("empty source".to_string()));
        }
        debug!(
            source = %request.source,
            clip = ?request.clip,
            tint = ?preview_tint(&request),
            "player opened"
        );
        Ok(Box::new(HeadlessHandle {
            request,
            released: false,
        }))
    }
}
