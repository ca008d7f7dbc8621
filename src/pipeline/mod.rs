//! Page bootstrap: pick a pipeline and drive it to completion.
//!
//! The surrounding page supplies a [`PageMode`] and a [`PageHooks`]
//! implementation. Bootstrap initializes elements and the preloader, builds a
//! [`PageContext`], and runs either the reports pipeline or the gallery
//! pipeline. Feed and collaborator failures end in a degraded outcome (progress
//! at 100, preloader hidden); only init hook failures are errors.

mod bootstrap;
mod detect;

pub use bootstrap::{Bootstrap, FAILURE_MESSAGE, LOADING_MESSAGE};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::progress::{ProgressReporter, ProgressSinks};
use crate::render::Mount;
use crate::reports::RawRecord;
use crate::scheduler::Scheduler;
use crate::state::StateStore;

/// Gallery items are untyped sheet rows, like report rows.
pub type Asset = RawRecord;

/// Which pipeline a page runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// The page hosts the reports list.
    Reports,
    /// The page hosts the asset gallery.
    Gallery,
    /// Neither; no pipeline runs.
    Other,
}

impl PageMode {
    /// Classify from element presence. Reports wins when both are present.
    pub fn from_flags(has_reports: bool, has_gallery: bool) -> Self {
        if has_reports {
            PageMode::Reports
        } else if has_gallery {
            PageMode::Gallery
        } else {
            PageMode::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageMode::Reports => "reports",
            PageMode::Gallery => "gallery",
            PageMode::Other => "other",
        }
    }
}

impl std::fmt::Display for PageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elements resolved by [`PageHooks::init_elements`].
#[derive(Default)]
pub struct PageElements {
    /// Where report cards are rendered.
    pub reports_mount: Option<Box<dyn Mount>>,
}

/// Collaborators supplied by the surrounding page.
///
/// `init_elements` and `init_preloader` are required. Everything else
/// defaults to a no-op, so a page only implements what it has.
#[async_trait]
pub trait PageHooks: Send {
    /// Resolve the page's mounts. Failure aborts the load.
    fn init_elements(&mut self) -> anyhow::Result<PageElements>;

    /// Resolve the progress sinks. Failure aborts the load.
    fn init_preloader(&mut self) -> anyhow::Result<ProgressSinks>;

    fn init_favorites(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn init_paging(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn init_placeholders(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Fetch the gallery rows. No source means an empty gallery.
    async fn load_assets(&mut self) -> anyhow::Result<Vec<Asset>> {
        Ok(Vec::new())
    }

    /// Build display cards for the gallery.
    async fn create_asset_cards(&mut self, _assets: &[Asset]) -> anyhow::Result<()> {
        Ok(())
    }

    /// Run the preloader animation; `final_pass` plays the closing sequence.
    async fn cycle_preloader_frames(&mut self, _final_pass: bool) -> anyhow::Result<()> {
        Ok(())
    }

    /// Show gallery page `page` (1-based).
    fn go_to_page(&mut self, _page: u32) {}
}

/// Per-load context handed to each stage in place of global element lookups.
pub struct PageContext {
    pub progress: ProgressReporter,
    pub mount: Option<Box<dyn Mount>>,
    pub store: Arc<dyn StateStore>,
    pub scheduler: Arc<dyn Scheduler>,
}

impl PageContext {
    pub fn new(
        elements: PageElements,
        sinks: ProgressSinks,
        store: Arc<dyn StateStore>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            progress: ProgressReporter::new(sinks, scheduler.clone()),
            mount: elements.reports_mount,
            store,
            scheduler,
        }
    }
}

/// How a page load ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Reports pipeline finished; this many cards were rendered.
    Rendered(usize),
    /// Gallery pipeline finished and restored this page.
    GalleryReady { page: u32 },
    /// A stage failed; the indicator was forced to completion.
    Degraded(String),
    /// The page matched no pipeline.
    Skipped,
}

/// A required init hook failed; nothing ran.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Element initialization failed")]
    Elements(#[source] anyhow::Error),

    #[error("Preloader initialization failed")]
    Preloader(#[source] anyhow::Error),
}
