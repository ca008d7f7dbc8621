//! Terminal progress bar for headless runs.

use indicatif::{ProgressBar, ProgressStyle};

use super::{FillSink, LabelSink, PreloaderSink};

const TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

/// Fill, label and preloader backed by one `indicatif` bar.
#[derive(Clone)]
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        let bar = ProgressBar::new(100);
        bar.set_style(style);
        Self { bar }
    }

    /// Hidden bar, for output that is not a terminal.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl FillSink for TerminalProgress {
    fn set_width(&mut self, percent: u8) {
        self.bar.set_position(percent as u64);
    }
}

impl LabelSink for TerminalProgress {
    fn set_text(&mut self, text: &str) {
        self.bar.set_message(text.to_string());
    }
}

impl PreloaderSink for TerminalProgress {
    fn begin_fade(&mut self) {
        self.bar.tick();
    }

    fn hide(&mut self) {
        // Keep the final label visible; failure text lives there
        self.bar.finish();
    }
}
