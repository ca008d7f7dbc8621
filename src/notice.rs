//! One-time update notice.
//!
//! The notice appears once per session after a short delay, unless the user
//! already closed it this session or opted out of the current version.
//!
//! ```text
//! Hidden --start--> PendingShow --reveal--> Shown
//!    |                  |                     |
//!    +---(opted out)----+----close/opt out----+--> Dismissed
//! ```
//!
//! `Dismissed` is terminal for the session.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::scheduler::Scheduler;
use crate::state::{durable_or_absent, keys, session_or_absent, StateStore};

/// Version tag of the current notice.
pub const CURRENT_VERSION: &str = "v0.8";
/// Delay between page load and the notice appearing.
pub const DISPLAY_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeState {
    Hidden,
    PendingShow,
    Shown,
    Dismissed,
}

/// The notice's on-page presentation.
pub trait NoticeView: Send {
    fn show(&mut self);
    fn hide(&mut self);
    /// Stop any embedded media so it does not keep playing once closed.
    fn stop_media(&mut self) {}
    /// Open a related page.
    fn open(&mut self, _url: &str) {}
}

#[derive(Debug, Clone)]
pub struct NoticeConfig {
    pub version: String,
    pub delay: Duration,
    pub updates_page: String,
    pub update_info_page: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            delay: DISPLAY_DELAY,
            updates_page: "system/pages/updates.html".to_string(),
            update_info_page: "system/pages/update-info.html".to_string(),
        }
    }
}

pub struct NoticeController {
    state: NoticeState,
    config: NoticeConfig,
    store: Arc<dyn StateStore>,
    view: Box<dyn NoticeView>,
}

impl NoticeController {
    pub fn new(config: NoticeConfig, store: Arc<dyn StateStore>, view: Box<dyn NoticeView>) -> Self {
        Self {
            state: NoticeState::Hidden,
            config,
            store,
            view,
        }
    }

    pub fn state(&self) -> NoticeState {
        self.state
    }

    /// Decide whether the notice should be scheduled.
    pub fn start(&mut self) -> NoticeState {
        if self.state != NoticeState::Hidden {
            return self.state;
        }

        let opted_out = durable_or_absent(self.store.as_ref(), keys::DISMISSED_UPDATE_VERSION)
            .is_some_and(|v| v == self.config.version);
        let closed = session_or_absent(self.store.as_ref(), keys::UPDATE_POPUP_CLOSED)
            .is_some_and(|v| !v.is_empty());

        self.state = if opted_out || closed {
            debug!(
                "Update notice suppressed (opted out: {}, closed this session: {})",
                opted_out, closed
            );
            NoticeState::Dismissed
        } else {
            NoticeState::PendingShow
        };
        self.state
    }

    /// Show the notice if it is still pending. Call once the delay has passed.
    pub fn reveal(&mut self) -> NoticeState {
        if self.state == NoticeState::PendingShow {
            self.view.show();
            self.state = NoticeState::Shown;
        }
        self.state
    }

    /// `start`, wait the display delay, then `reveal`.
    pub async fn launch(&mut self, scheduler: &dyn Scheduler) -> NoticeState {
        if self.start() == NoticeState::PendingShow {
            scheduler.sleep(self.config.delay).await;
            self.reveal();
        }
        self.state
    }

    /// Close for the rest of this session.
    pub fn close(&mut self) {
        self.view.hide();
        self.view.stop_media();
        if let Err(e) = self.store.set_session(keys::UPDATE_POPUP_CLOSED, "true") {
            warn!("Failed to record notice close: {}", e);
        }
        self.state = NoticeState::Dismissed;
    }

    /// Opt out of this version permanently, then close.
    pub fn dont_show_again(&mut self) {
        if let Err(e) = self
            .store
            .set_durable(keys::DISMISSED_UPDATE_VERSION, &self.config.version)
        {
            warn!("Failed to record notice opt-out: {}", e);
        }
        self.close();
    }

    pub fn view_updates(&mut self) {
        let url = self.config.updates_page.clone();
        self.view.open(&url);
    }

    pub fn view_update_info(&mut self) {
        let url = self.config.update_info_page.clone();
        self.view.open(&url);
    }
}
