//! Render stage: report cards into a page mount.

pub mod templates;

use std::sync::{Arc, Mutex};

use crate::reports::Report;

/// A region of the page that receives rendered HTML.
pub trait Mount: Send {
    /// Remove all prior content.
    fn clear(&mut self);
    /// Append an HTML fragment.
    fn append_html(&mut self, html: &str);
}

/// String-backed mount. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct HtmlMount {
    buffer: Arc<Mutex<String>>,
}

impl HtmlMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl Mount for HtmlMount {
    fn clear(&mut self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }

    fn append_html(&mut self, html: &str) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push_str(html);
        }
    }
}

/// Replace the mount's content with one card per report, in the given order.
///
/// An empty slice renders the empty-state placeholder. No mount, no output.
pub fn render_reports(mount: Option<&mut (dyn Mount + '_)>, reports: &[Report]) {
    let Some(mount) = mount else {
        return;
    };

    mount.clear();

    if reports.is_empty() {
        mount.append_html(templates::EMPTY_STATE);
        return;
    }

    let fragment: String = reports.iter().map(templates::report_card).collect();
    mount.append_html(&fragment);
}
