//! End-to-end page loads against in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;

use sitefeed::feed::{FeedError, FeedLoader, StaticFeed};
use sitefeed::pipeline::{
    Asset, Bootstrap, BootstrapError, PageElements, PageHooks, PageMode, PipelineOutcome,
    FAILURE_MESSAGE, LOADING_MESSAGE,
};
use sitefeed::progress::{ProgressEvent, ProgressSinks, RecordingSink};
use sitefeed::render::{templates, HtmlMount};
use sitefeed::reports::RawRecord;
use sitefeed::scheduler::InstantScheduler;
use sitefeed::state::{keys, MemoryStore, StateStore};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

#[derive(Default)]
struct TestHooks {
    mount: HtmlMount,
    sink: RecordingSink,
    calls: Arc<Mutex<Vec<String>>>,
    fail_elements: bool,
    fail_preloader: bool,
    fail_assets: bool,
    fail_cards: bool,
    with_mount: bool,
}

impl TestHooks {
    fn new() -> Self {
        Self {
            with_mount: true,
            ..Default::default()
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageHooks for TestHooks {
    fn init_elements(&mut self) -> anyhow::Result<PageElements> {
        if self.fail_elements {
            anyhow::bail!("missing #preloader");
        }
        let reports_mount: Option<Box<dyn sitefeed::render::Mount>> = if self.with_mount {
            Some(Box::new(self.mount.clone()))
        } else {
            None
        };
        Ok(PageElements { reports_mount })
    }

    fn init_preloader(&mut self) -> anyhow::Result<ProgressSinks> {
        if self.fail_preloader {
            anyhow::bail!("missing #progress-fill");
        }
        Ok(ProgressSinks::all(self.sink.clone()))
    }

    fn init_paging(&mut self) -> anyhow::Result<()> {
        self.record("init_paging");
        Ok(())
    }

    async fn load_assets(&mut self) -> anyhow::Result<Vec<Asset>> {
        self.record("load_assets");
        if self.fail_assets {
            anyhow::bail!("sheet unreachable");
        }
        Ok(vec![RawRecord::from(json!({"name": "one"}))])
    }

    async fn create_asset_cards(&mut self, assets: &[Asset]) -> anyhow::Result<()> {
        self.record(format!("create_asset_cards {}", assets.len()));
        if self.fail_cards {
            anyhow::bail!("card template missing");
        }
        Ok(())
    }

    async fn cycle_preloader_frames(&mut self, final_pass: bool) -> anyhow::Result<()> {
        self.record(format!("cycle_preloader_frames {}", final_pass));
        Ok(())
    }

    fn go_to_page(&mut self, page: u32) {
        self.record(format!("go_to_page {}", page));
    }
}

struct RejectingFeed;

#[async_trait]
impl FeedLoader for RejectingFeed {
    async fn load_feed(&self) -> Result<Vec<RawRecord>, FeedError> {
        Err(FeedError::Unavailable("HTTP 403 Forbidden".to_string()))
    }
}

fn bootstrap(feed: Arc<dyn FeedLoader>, store: Arc<MemoryStore>) -> Bootstrap {
    Bootstrap::new(feed, store, Arc::new(InstantScheduler::new())).with_fixed_clock(now())
}

fn feed_of(rows: serde_json::Value) -> Arc<dyn FeedLoader> {
    Arc::new(StaticFeed::new(rows.to_string()))
}

#[tokio::test]
async fn single_fresh_report_is_rendered() {
    let feed = feed_of(json!([{"ID": "1", "title": "Bug", "created": now().to_rfc3339()}]));
    let mut hooks = TestHooks::new();

    let outcome = bootstrap(feed, Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Rendered(1));
    let html = hooks.mount.contents();
    assert!(html.contains("#1"));
    assert!(!html.contains("No active reports."));
    assert_eq!(hooks.sink.fills(), vec![5, 30, 75, 100]);
    assert_eq!(hooks.sink.labels().first().map(String::as_str), Some(LOADING_MESSAGE));
    assert!(hooks.sink.events().contains(&ProgressEvent::LoadedShown));
    assert_eq!(hooks.sink.events().last(), Some(&ProgressEvent::Hidden));
}

#[tokio::test]
async fn expired_report_shows_empty_state() {
    let created = (now() - Duration::days(10)).to_rfc3339();
    let feed = feed_of(json!([{"ID": "1", "title": "Old", "created": created}]));
    let mut hooks = TestHooks::new();

    let outcome = bootstrap(feed, Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Rendered(0));
    assert_eq!(hooks.mount.contents(), templates::EMPTY_STATE);
}

#[tokio::test]
async fn report_without_id_is_excluded() {
    let feed = feed_of(json!([{
        "title": "No id",
        "paragraph": "body",
        "created": now().to_rfc3339(),
        "type": "bug",
        "status": "open",
    }]));
    let mut hooks = TestHooks::new();

    let outcome = bootstrap(feed, Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Rendered(0));
    assert_eq!(hooks.mount.contents(), templates::EMPTY_STATE);
}

#[tokio::test]
async fn rejected_feed_degrades_to_completion() {
    let mut hooks = TestHooks::new();

    let outcome = bootstrap(Arc::new(RejectingFeed), Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    assert!(matches!(outcome, PipelineOutcome::Degraded(_)));
    assert_eq!(hooks.sink.fills().last(), Some(&100));
    assert_eq!(
        hooks.sink.labels().last().map(String::as_str),
        Some(FAILURE_MESSAGE)
    );
    assert!(hooks.sink.is_hidden());
    // Nothing was rendered
    assert!(hooks.mount.contents().is_empty());
}

#[tokio::test]
async fn malformed_feed_degrades_like_unavailable() {
    let feed = feed_of(json!({"error": "quota exceeded"}));
    let mut hooks = TestHooks::new();

    let outcome = bootstrap(feed, Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    match outcome {
        PipelineOutcome::Degraded(reason) => assert!(reason.contains("malformed")),
        other => panic!("expected degraded outcome, got {:?}", other),
    }
    assert!(hooks.sink.is_hidden());
}

#[tokio::test]
async fn identical_timestamps_keep_feed_order() {
    let created = (now() - Duration::hours(2)).to_rfc3339();
    let feed = feed_of(json!([
        {"ID": "first", "title": "A", "created": created},
        {"ID": "second", "title": "B", "created": created},
    ]));
    let mut hooks = TestHooks::new();

    let outcome = bootstrap(feed, Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Rendered(2));
    let html = hooks.mount.contents();
    assert!(html.find("#first").unwrap() < html.find("#second").unwrap());
}

#[tokio::test]
async fn missing_mount_still_completes() {
    let feed = feed_of(json!([{"ID": "1", "title": "Bug", "created": now().to_rfc3339()}]));
    let mut hooks = TestHooks {
        with_mount: false,
        ..TestHooks::new()
    };

    let outcome = bootstrap(feed, Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Rendered(1));
    assert!(hooks.sink.is_hidden());
}

#[tokio::test]
async fn init_failure_runs_nothing() {
    let mut hooks = TestHooks {
        fail_elements: true,
        ..TestHooks::new()
    };

    let result = bootstrap(Arc::new(RejectingFeed), Arc::new(MemoryStore::new()))
        .run(PageMode::Gallery, &mut hooks)
        .await;

    assert!(matches!(result, Err(BootstrapError::Elements(_))));
    assert!(hooks.calls().is_empty());
    assert!(hooks.sink.events().is_empty());
}

#[tokio::test]
async fn other_pages_are_skipped() {
    let mut hooks = TestHooks::new();
    let outcome = bootstrap(Arc::new(RejectingFeed), Arc::new(MemoryStore::new()))
        .run(PageMode::Other, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::Skipped);
    assert!(hooks.sink.events().is_empty());
}

#[tokio::test]
async fn gallery_restores_saved_page() {
    let store = Arc::new(MemoryStore::new());
    store.set_session(keys::CURRENT_PAGE, "3").unwrap();
    let scheduler = Arc::new(InstantScheduler::new());
    let mut hooks = TestHooks::new();

    let outcome = Bootstrap::new(Arc::new(RejectingFeed), store, scheduler.clone())
        .run(PageMode::Gallery, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::GalleryReady { page: 3 });
    assert_eq!(
        hooks.calls(),
        vec![
            "init_paging",
            "load_assets",
            "create_asset_cards 1",
            "cycle_preloader_frames true",
            "go_to_page 3",
        ]
    );
    assert_eq!(hooks.sink.fills(), vec![5, 60, 85, 100]);
    assert_eq!(scheduler.frames(), 1);
    assert!(hooks.sink.is_hidden());
}

#[tokio::test]
async fn gallery_defaults_to_first_page() {
    let mut hooks = TestHooks::new();
    let outcome = bootstrap(Arc::new(RejectingFeed), Arc::new(MemoryStore::new()))
        .run(PageMode::Gallery, &mut hooks)
        .await
        .unwrap();

    assert_eq!(outcome, PipelineOutcome::GalleryReady { page: 1 });
    assert_eq!(hooks.calls().last().map(String::as_str), Some("go_to_page 1"));
}

#[tokio::test]
async fn gallery_failure_hides_immediately() {
    let scheduler = Arc::new(InstantScheduler::new());
    let mut hooks = TestHooks {
        fail_assets: true,
        ..TestHooks::new()
    };

    let outcome = Bootstrap::new(
        Arc::new(RejectingFeed),
        Arc::new(MemoryStore::new()),
        scheduler.clone(),
    )
    .run(PageMode::Gallery, &mut hooks)
    .await
    .unwrap();

    assert!(matches!(outcome, PipelineOutcome::Degraded(_)));
    assert_eq!(hooks.sink.fills(), vec![5, 100]);
    assert!(hooks.sink.is_hidden());
    // Immediate hide skips the fade wait; no page restore after failure
    assert!(scheduler.waits().is_empty());
    assert!(!hooks.calls().iter().any(|c| c.starts_with("go_to_page")));
}

#[tokio::test]
async fn preloader_init_failure_runs_nothing() {
    let mut hooks = TestHooks {
        fail_preloader: true,
        ..TestHooks::new()
    };

    let result = bootstrap(Arc::new(RejectingFeed), Arc::new(MemoryStore::new()))
        .run(PageMode::Reports, &mut hooks)
        .await;

    assert!(matches!(result, Err(BootstrapError::Preloader(_))));
    assert!(hooks.sink.events().is_empty());
    assert!(hooks.mount.contents().is_empty());
}

#[tokio::test]
async fn gallery_card_failure_completes_immediately() {
    let scheduler = Arc::new(InstantScheduler::new());
    let mut hooks = TestHooks {
        fail_cards: true,
        ..TestHooks::new()
    };

    let outcome = Bootstrap::new(
        Arc::new(RejectingFeed),
        Arc::new(MemoryStore::new()),
        scheduler.clone(),
    )
    .run(PageMode::Gallery, &mut hooks)
    .await
    .unwrap();

    match outcome {
        PipelineOutcome::Degraded(reason) => assert!(reason.contains("card template missing")),
        other => panic!("expected degraded outcome, got {:?}", other),
    }
    assert_eq!(hooks.sink.fills(), vec![5, 60, 100]);
    assert!(hooks.sink.is_hidden());
    assert!(scheduler.waits().is_empty());
    assert_eq!(scheduler.frames(), 0);
    assert!(!hooks
        .calls()
        .iter()
        .any(|c| c.starts_with("cycle_preloader_frames") || c.starts_with("go_to_page")));
}
