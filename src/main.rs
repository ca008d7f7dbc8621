use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitefeed::feed::{FeedError, FeedLoader, HttpFeedLoader};
use sitefeed::notice::{NoticeController, NoticeState, NoticeView};
use sitefeed::pipeline::{Bootstrap, PageElements, PageHooks, PageMode, PipelineOutcome};
use sitefeed::progress::{ProgressSinks, TerminalProgress};
use sitefeed::render::{templates, HtmlMount};
use sitefeed::reports::RawRecord;
use sitefeed::scheduler::{InstantScheduler, Scheduler, TokioScheduler};
use sitefeed::state::{SqliteStore, StateStore};
use sitefeed::Settings;

#[derive(Parser)]
#[command(name = "sitefeed", version, about = "Report feed pipeline for a static site")]
struct Cli {
    /// Report feed endpoint (overrides config)
    #[arg(long, env = "SITEFEED_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Data directory for persisted state (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a page load headless
    Run {
        /// HTML page to classify; ignored when --mode is given
        #[arg(long)]
        page: Option<PathBuf>,
        /// Pipeline to run
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Write a standalone HTML page here instead of printing the fragment
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Skip cosmetic delays
        #[arg(long)]
        no_delays: bool,
    },
    /// Print the pipeline an HTML page would run
    Detect { file: PathBuf },
    /// Evaluate the update notice against persisted state
    Notice {
        /// Close the notice for this session. A session lasts one invocation,
        /// so the next run shows the notice again; use --dont-show-again to
        /// persist the dismissal
        #[arg(long)]
        close: bool,
        /// Stop showing this notice version
        #[arg(long, conflicts_with = "close")]
        dont_show_again: bool,
        /// Print the updates and update info pages
        #[arg(long)]
        links: bool,
        /// Skip the display delay
        #[arg(long)]
        no_delays: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Reports,
    Gallery,
}

impl From<ModeArg> for PageMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Reports => PageMode::Reports,
            ModeArg::Gallery => PageMode::Gallery,
        }
    }
}

/// Hooks for a terminal run: one HTML mount and a progress bar.
struct CliHooks {
    mount: HtmlMount,
    progress: TerminalProgress,
}

#[async_trait]
impl PageHooks for CliHooks {
    fn init_elements(&mut self) -> anyhow::Result<PageElements> {
        Ok(PageElements {
            reports_mount: Some(Box::new(self.mount.clone())),
        })
    }

    fn init_preloader(&mut self) -> anyhow::Result<ProgressSinks> {
        Ok(ProgressSinks::all(self.progress.clone()))
    }

    fn go_to_page(&mut self, page: u32) {
        info!("Gallery page {}", page);
    }
}

/// Stand-in loader when no endpoint is configured.
struct NoEndpoint;

#[async_trait]
impl FeedLoader for NoEndpoint {
    async fn load_feed(&self) -> Result<Vec<RawRecord>, FeedError> {
        Err(FeedError::Unavailable(
            "no feed endpoint configured".to_string(),
        ))
    }
}

/// Notice rendered as terminal text.
struct ConsoleNotice {
    version: String,
}

impl NoticeView for ConsoleNotice {
    fn show(&mut self) {
        println!("Update {} is available.", self.version);
    }

    fn hide(&mut self) {
        println!("Update notice closed.");
    }

    fn open(&mut self, url: &str) {
        println!("See {}", url);
    }
}

fn scheduler_for(no_delays: bool) -> Arc<dyn Scheduler> {
    if no_delays {
        Arc::new(InstantScheduler::new())
    } else {
        Arc::new(TokioScheduler)
    }
}

fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn StateStore>> {
    settings
        .ensure_directories()
        .with_context(|| format!("creating {}", settings.data_dir.display()))?;
    let store = SqliteStore::open(&settings.state_database_path())?;
    Ok(Arc::new(store))
}

fn feed_loader(settings: &Settings) -> anyhow::Result<Arc<dyn FeedLoader>> {
    match settings.feed_endpoint.as_deref() {
        Some(endpoint) => Ok(Arc::new(HttpFeedLoader::with_options(
            endpoint,
            settings.user_agent.as_deref(),
            settings.request_timeout(),
        )?)),
        None => Ok(Arc::new(NoEndpoint)),
    }
}

async fn run_page(
    settings: &Settings,
    page: Option<PathBuf>,
    mode: Option<ModeArg>,
    output: Option<PathBuf>,
    no_delays: bool,
) -> anyhow::Result<()> {
    let mode = match (mode, page) {
        (Some(mode), _) => PageMode::from(mode),
        (None, Some(page)) => {
            let html = std::fs::read_to_string(&page)
                .with_context(|| format!("reading {}", page.display()))?;
            PageMode::detect_html(&html)
        }
        (None, None) => PageMode::Reports,
    };

    let progress = if std::io::stderr().is_terminal() {
        TerminalProgress::new()
    } else {
        TerminalProgress::hidden()
    };
    let mut hooks = CliHooks {
        mount: HtmlMount::new(),
        progress,
    };

    let bootstrap = Bootstrap::new(
        feed_loader(settings)?,
        open_store(settings)?,
        scheduler_for(no_delays),
    )
    .with_limits(settings.limits);

    let outcome = bootstrap.run(mode, &mut hooks).await?;

    if mode == PageMode::Reports {
        let fragment = hooks.mount.contents();
        match output {
            Some(path) => {
                std::fs::write(&path, templates::page_document("Reports", &fragment))
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("Wrote {}", path.display());
            }
            None => println!("{}", fragment),
        }
    }

    if let PipelineOutcome::Degraded(reason) = outcome {
        anyhow::bail!("page load degraded: {}", reason);
    }
    Ok(())
}

async fn run_notice(
    settings: &Settings,
    close: bool,
    dont_show_again: bool,
    links: bool,
    no_delays: bool,
) -> anyhow::Result<()> {
    let view = ConsoleNotice {
        version: settings.notice.version.clone(),
    };
    let mut notice =
        NoticeController::new(settings.notice.clone(), open_store(settings)?, Box::new(view));

    let state = notice.launch(scheduler_for(no_delays).as_ref()).await;
    if links {
        notice.view_updates();
        notice.view_update_info();
    }
    if state == NoticeState::Shown {
        if dont_show_again {
            notice.dont_show_again();
        } else if close {
            notice.close();
        }
    }

    println!("Notice state: {:?}", notice.state());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = sitefeed::load_settings().await;
    if let Some(endpoint) = cli.endpoint {
        settings.feed_endpoint = Some(endpoint);
    }
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }

    match cli.command {
        Command::Run {
            page,
            mode,
            output,
            no_delays,
        } => run_page(&settings, page, mode, output, no_delays).await,
        Command::Detect { file } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            println!("{}", PageMode::detect_html(&html));
            Ok(())
        }
        Command::Notice {
            close,
            dont_show_again,
            links,
            no_delays,
        } => run_notice(&settings, close, dont_show_again, links, no_delays).await,
    }
}
