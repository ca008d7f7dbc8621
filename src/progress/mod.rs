//! Staged progress indicator.
//!
//! A [`ProgressReporter`] owns up to three optional sinks: a fill bar, a text
//! label and the preloader overlay itself. Missing sinks are a valid
//! headless mode, not an error. Reporters are only handed out by page
//! bootstrap, so nothing can report before initialization.

mod recording;
mod terminal;

pub use recording::{ProgressEvent, RecordingSink};
pub use terminal::TerminalProgress;

use std::sync::Arc;
use std::time::Duration;

use crate::scheduler::Scheduler;
use crate::util::clamp_percent;

/// Fade-out duration before the preloader is removed.
pub const FADE_OUT_DELAY: Duration = Duration::from_millis(450);
/// How long the "loaded" artwork stays up before the fade starts.
pub const LOADED_STATE_DELAY: Duration = Duration::from_millis(900);

/// Visual fill width, in percent.
pub trait FillSink: Send {
    fn set_width(&mut self, percent: u8);
}

/// Textual progress label.
pub trait LabelSink: Send {
    fn set_text(&mut self, text: &str);
}

/// The overlay shown while a page is loading.
pub trait PreloaderSink: Send {
    /// Start fading the overlay out.
    fn begin_fade(&mut self);
    /// Remove the overlay from view.
    fn hide(&mut self);
    /// Swap the loading artwork for the loaded artwork.
    fn show_loaded(&mut self) {}
}

/// Sinks resolved from the page during element initialization.
#[derive(Default)]
pub struct ProgressSinks {
    pub fill: Option<Box<dyn FillSink>>,
    pub label: Option<Box<dyn LabelSink>>,
    pub preloader: Option<Box<dyn PreloaderSink>>,
}

impl ProgressSinks {
    /// Route all three concerns to a single sink value.
    pub fn all<S>(sink: S) -> Self
    where
        S: FillSink + LabelSink + PreloaderSink + Clone + 'static,
    {
        Self {
            fill: Some(Box::new(sink.clone())),
            label: Some(Box::new(sink.clone())),
            preloader: Some(Box::new(sink)),
        }
    }
}

pub struct ProgressReporter {
    sinks: ProgressSinks,
    scheduler: Arc<dyn Scheduler>,
    current: u8,
}

impl ProgressReporter {
    pub fn new(sinks: ProgressSinks, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            sinks,
            scheduler,
            current: 0,
        }
    }

    /// Last reported value.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Whether a preloader overlay is attached.
    pub fn has_preloader(&self) -> bool {
        self.sinks.preloader.is_some()
    }

    /// Clamp `percent` to 0..=100 and push it to the fill and label sinks.
    ///
    /// Callers are expected to move forward, but lower values are accepted.
    pub fn update_progress(&mut self, percent: f64) {
        let value = clamp_percent(percent);
        self.current = value;

        if let Some(fill) = self.sinks.fill.as_mut() {
            fill.set_width(value);
        }
        if let Some(label) = self.sinks.label.as_mut() {
            label.set_text(&format!("{}%", value));
        }
    }

    /// Replace the label text regardless of numeric progress.
    pub fn show_loading(&mut self, text: &str) {
        if let Some(label) = self.sinks.label.as_mut() {
            label.set_text(text);
        }
    }

    /// Swap in the loaded artwork and hold it briefly.
    pub async fn show_loaded_state(&mut self) {
        let Some(preloader) = self.sinks.preloader.as_mut() else {
            return;
        };
        preloader.show_loaded();
        self.scheduler.sleep(LOADED_STATE_DELAY).await;
    }

    /// Fade the preloader out. `immediate` skips the fade wait.
    pub async fn hide_preloader(&mut self, immediate: bool) {
        let Some(preloader) = self.sinks.preloader.as_mut() else {
            return;
        };
        preloader.begin_fade();
        if !immediate {
            self.scheduler.sleep(FADE_OUT_DELAY).await;
        }
        preloader.hide();
    }
}
