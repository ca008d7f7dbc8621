//! Reports and gallery pipelines.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::{BootstrapError, PageContext, PageHooks, PageMode, PipelineOutcome};
use crate::feed::{FeedError, FeedLoader};
use crate::render::render_reports;
use crate::reports::{select_reports_with, SelectionLimits};
use crate::scheduler::Scheduler;
use crate::state::{keys, session_or_absent, StateStore};

/// Label shown while the feed is loading.
pub const LOADING_MESSAGE: &str = "Loading reports...";
/// Label left in place when the reports pipeline fails.
pub const FAILURE_MESSAGE: &str = "⚠ Failed to load reports";

/// Pause after reaching 100% before the loaded artwork is shown.
const SETTLE_DELAY: Duration = Duration::from_millis(120);

/// Runs one page load.
pub struct Bootstrap {
    feed: Arc<dyn FeedLoader>,
    store: Arc<dyn StateStore>,
    scheduler: Arc<dyn Scheduler>,
    limits: SelectionLimits,
    fixed_now: Option<DateTime<Utc>>,
}

impl Bootstrap {
    pub fn new(
        feed: Arc<dyn FeedLoader>,
        store: Arc<dyn StateStore>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            feed,
            store,
            scheduler,
            limits: SelectionLimits::default(),
            fixed_now: None,
        }
    }

    pub fn with_limits(mut self, limits: SelectionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Evaluate report ages against `now` instead of the wall clock.
    pub fn with_fixed_clock(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// Initialize the page and run the pipeline for `mode`.
    ///
    /// Only init hook failures are returned as errors; every later failure
    /// becomes [`PipelineOutcome::Degraded`].
    pub async fn run(
        &self,
        mode: PageMode,
        hooks: &mut dyn PageHooks,
    ) -> Result<PipelineOutcome, BootstrapError> {
        let elements = hooks.init_elements().map_err(|e| {
            error!("Core init failed: {:#}", e);
            BootstrapError::Elements(e)
        })?;
        let sinks = hooks.init_preloader().map_err(|e| {
            error!("Core init failed: {:#}", e);
            BootstrapError::Preloader(e)
        })?;

        let mut ctx = PageContext::new(elements, sinks, self.store.clone(), self.scheduler.clone());

        let outcome = match mode {
            PageMode::Reports => self.run_reports(&mut ctx).await,
            PageMode::Gallery => self.run_gallery(&mut ctx, hooks).await,
            PageMode::Other => {
                debug!("Page matches no pipeline; nothing to load");
                PipelineOutcome::Skipped
            }
        };

        Ok(outcome)
    }

    /// Fetch, select and render reports, degrading on any failure.
    pub async fn run_reports(&self, ctx: &mut PageContext) -> PipelineOutcome {
        match self.report_stages(ctx).await {
            Ok(rendered) => {
                info!("Reports system ready ({} reports)", rendered);
                PipelineOutcome::Rendered(rendered)
            }
            Err(e) => {
                warn!("Reports load failed: {}", e);
                ctx.progress.update_progress(100.0);
                ctx.progress.show_loading(FAILURE_MESSAGE);
                ctx.progress.hide_preloader(false).await;
                PipelineOutcome::Degraded(e.to_string())
            }
        }
    }

    async fn report_stages(&self, ctx: &mut PageContext) -> Result<usize, FeedError> {
        ctx.progress.show_loading(LOADING_MESSAGE);
        ctx.progress.update_progress(5.0);

        let raw = self.feed.load_feed().await?;
        ctx.progress.update_progress(30.0);

        let reports = select_reports_with(&raw, self.now(), &self.limits);
        debug!("Selected {} of {} feed rows", reports.len(), raw.len());
        ctx.progress.update_progress(75.0);

        render_reports(ctx.mount.as_deref_mut(), &reports);
        ctx.progress.update_progress(100.0);

        ctx.scheduler.sleep(SETTLE_DELAY).await;
        ctx.progress.show_loaded_state().await;
        ctx.progress.hide_preloader(false).await;

        Ok(reports.len())
    }

    /// Load and lay out the gallery, then restore the last viewed page.
    pub async fn run_gallery(
        &self,
        ctx: &mut PageContext,
        hooks: &mut dyn PageHooks,
    ) -> PipelineOutcome {
        match self.gallery_stages(ctx, hooks).await {
            Ok(()) => {
                let page = restore_page(ctx.store.as_ref());
                debug!("Restoring gallery page {}", page);
                hooks.go_to_page(page);
                info!("Gallery ready on page {}", page);
                PipelineOutcome::GalleryReady { page }
            }
            Err(e) => {
                warn!("Startup error: {:#}", e);
                ctx.progress.update_progress(100.0);
                ctx.progress.hide_preloader(true).await;
                PipelineOutcome::Degraded(format!("{:#}", e))
            }
        }
    }

    async fn gallery_stages(
        &self,
        ctx: &mut PageContext,
        hooks: &mut dyn PageHooks,
    ) -> anyhow::Result<()> {
        hooks.init_favorites()?;
        hooks.init_paging()?;
        hooks.init_placeholders()?;

        ctx.progress.update_progress(5.0);

        let assets = hooks.load_assets().await?;
        ctx.progress.update_progress(60.0);

        hooks.create_asset_cards(&assets).await?;
        ctx.progress.update_progress(85.0);

        ctx.scheduler.next_frame().await;

        hooks.cycle_preloader_frames(true).await?;

        ctx.progress.update_progress(100.0);
        ctx.progress.hide_preloader(false).await;

        Ok(())
    }
}

/// Last viewed gallery page from the session, defaulting to 1.
pub fn restore_page(store: &dyn StateStore) -> u32 {
    session_or_absent(store, keys::CURRENT_PAGE)
        .and_then(|saved| saved.trim().parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}
