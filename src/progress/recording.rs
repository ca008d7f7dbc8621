//! In-memory sink that records everything it is told.

use std::sync::{Arc, Mutex};

use super::{FillSink, LabelSink, PreloaderSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Fill(u8),
    Label(String),
    FadeStarted,
    Hidden,
    LoadedShown,
}

/// Cloneable recorder; clones share one event log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn fills(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Fill(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Label(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn is_hidden(&self) -> bool {
        self.events().contains(&ProgressEvent::Hidden)
    }

    fn push(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl FillSink for RecordingSink {
    fn set_width(&mut self, percent: u8) {
        self.push(ProgressEvent::Fill(percent));
    }
}

impl LabelSink for RecordingSink {
    fn set_text(&mut self, text: &str) {
        self.push(ProgressEvent::Label(text.to_string()));
    }
}

impl PreloaderSink for RecordingSink {
    fn begin_fade(&mut self) {
        self.push(ProgressEvent::FadeStarted);
    }

    fn hide(&mut self) {
        self.push(ProgressEvent::Hidden);
    }

    fn show_loaded(&mut self) {
        self.push(ProgressEvent::LoadedShown);
    }
}
