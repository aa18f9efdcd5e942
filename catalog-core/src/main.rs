//! src/main.rs
//! Terminal catalog browser

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event as TerminalEvent, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::{
    signal,
    sync::{Notify, mpsc},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use catalog_core::{
    CatalogEngine, Logger,
    config::Config,
    controller::{
        action_dispatcher::{ActionDispatcher, CHROME_ROWS},
        actions::{Action, KeyContext, KeyMap},
        event_loop::{EventLoop, MetricsSnap, TaskResult},
    },
    model::{
        query_sync::{InMemoryLocation, NavigableLocation},
        ui_state::UIState,
    },
    operators::catalog_client::{CatalogSource, HttpCatalogSource, spawn_catalog_fetch},
    storage::{favorites_store::FavoritesStore, kv_store::FileStore},
    util::debounce::DebounceConfig,
    view::{theme, ui::UIRenderer},
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Browse a remote product catalog in the terminal.
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about)]
struct Args {
    /// Config file to use instead of the platform default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start from a full location, e.g. `catalog://browse?q=art&sort=rating`.
    #[arg(long, value_name = "URL", conflicts_with = "query")]
    url: Option<String>,

    /// Start from a query string, e.g. `?q=art&cat=indoor`.
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Catalog endpoint overriding the configured one.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Keep the filter state out of the location.
    #[arg(long)]
    no_query_sync: bool,

    /// Log filter directive, e.g. `debug` or `catalog_core=trace`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_panic_handler();

    let app = App::new(args)
        .await
        .context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

struct App {
    terminal: AppTerminal,
    event_loop: EventLoop,
    engine: CatalogEngine,
    ui: UIState,
    key_map: KeyMap,
    dispatcher: ActionDispatcher,
    ui_renderer: UIRenderer,
    shutdown: Arc<Notify>,
    fetch: JoinHandle<()>,
    _log_guard: WorkerGuard,
}

impl App {
    async fn new(args: Args) -> Result<Self> {
        let loaded = match &args.config {
            Some(path) => Config::load_from(path).await,
            None => Config::load().await,
        };
        let (mut config, load_error) = match loaded {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        };

        if let Some(level) = &args.log_level {
            config.logging.level.clone_from(level);
        }
        if let Some(endpoint) = &args.endpoint {
            config.catalog.endpoint.clone_from(endpoint);
        }
        if args.no_query_sync {
            config.query_sync.enabled = false;
        }

        let log_guard = Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
        info!("Starting catalog browser");
        if let Some(e) = load_error {
            info!("Failed to load config, using defaults: {}", e);
        }
        debug!("Effective config: {:?}", config);

        let location = Self::location(&args, &config)?;

        let store_path = config.store_path().context("Failed to resolve store path")?;
        let store = FileStore::open(&store_path)
            .with_context(|| format!("Failed to open store {}", store_path.display()))?;
        info!("Favorites stored in {}", store.path().display());
        let favorites = FavoritesStore::new(Box::new(store), config.storage.favorites_key.clone());

        let http = HttpCatalogSource::new(&config.catalog).context("Failed to build HTTP client")?;
        info!("Fetching catalog from {}", http.endpoint());
        let source: Arc<dyn CatalogSource> = Arc::new(http);

        let (task_tx, task_rx) = mpsc::unbounded_channel::<TaskResult>();

        let engine = CatalogEngine::new(
            DebounceConfig::with_delay(config.search.debounce),
            favorites,
            location,
            task_tx.clone(),
        );

        let fetch = spawn_catalog_fetch(source, task_tx);

        let terminal = setup_terminal().context("Failed to initialize terminal")?;
        theme::init_theme();

        let mut ui = UIState::new();
        if let Ok(size) = terminal.size() {
            ui.set_viewport_height(usize::from(size.height.saturating_sub(CHROME_ROWS)));
        }

        info!("Application initialized successfully");

        Ok(Self {
            terminal,
            event_loop: EventLoop::new(task_rx),
            engine,
            ui,
            key_map: KeyMap::new(),
            dispatcher: ActionDispatcher::new(),
            ui_renderer: UIRenderer::new(),
            shutdown: Arc::new(Notify::new()),
            fetch,
            _log_guard: log_guard,
        })
    }

    /// `--url` wins over `--query`, which is resolved against the base URL.
    fn location(args: &Args, config: &Config) -> Result<Option<Box<dyn NavigableLocation>>> {
        if !config.query_sync.enabled {
            info!("Query sync disabled");
            return Ok(None);
        }

        let location = match (&args.url, &args.query) {
            (Some(url), _) => InMemoryLocation::parse(url)
                .with_context(|| format!("Invalid --url '{url}'"))?,
            (None, Some(query)) => InMemoryLocation::with_query(&config.query_sync.base_url, query)
                .with_context(|| format!("Invalid base URL '{}'", config.query_sync.base_url))?,
            (None, None) => InMemoryLocation::parse(&config.query_sync.base_url)
                .with_context(|| format!("Invalid base URL '{}'", config.query_sync.base_url))?,
        };

        info!("Initial location: {}", location.current());
        Ok(Some(Box::new(location)))
    }

    async fn run(mut self) -> Result<()> {
        self.setup_shutdown_handler();
        info!("Starting event loop");

        let mut event_stream: EventStream = EventStream::new();
        let mut ticker = tokio::time::interval(Duration::from_millis(250));

        loop {
            self.render()?;

            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if !self.process_terminal_event(event) {
                                break;
                            }
                        }
                        Some(Err(e)) => warn!("Terminal event error: {}", e),
                        None => {
                            info!("Terminal event stream closed");
                            break;
                        }
                    }
                }

                result = self.event_loop.next_task() => {
                    let start = Instant::now();
                    self.engine.on_task(result);
                    ActionDispatcher::after_task(&mut self.engine, &mut self.ui);
                    self.event_loop.record(start.elapsed(), false);
                }

                _ = ticker.tick() => {
                    let start = Instant::now();
                    self.dispatcher.dispatch(&mut self.engine, &mut self.ui, Action::Tick);
                    if self.engine.loading() {
                        self.ui.request_redraw();
                    }
                    self.event_loop.record(start.elapsed(), false);
                }
            }
        }

        self.log_final_metrics();
        info!("Event loop terminated cleanly");
        Ok(())
    }

    /// Returns `false` when the application should stop.
    fn process_terminal_event(&mut self, event: TerminalEvent) -> bool {
        let action = match event {
            TerminalEvent::Key(key_event) => {
                let context = KeyContext::resolve(self.ui.mode, self.engine.selected().is_some());
                // any key dismisses a notification
                if self.ui.notification.is_some() {
                    self.ui.dismiss_notification();
                }
                self.key_map.translate(context, key_event)
            }
            TerminalEvent::Resize(width, height) => Action::Resize(width, height),
            _ => Action::NoOp,
        };

        let start = Instant::now();
        let keep_running = self.dispatcher.dispatch(&mut self.engine, &mut self.ui, action);
        self.event_loop.record(start.elapsed(), true);
        keep_running
    }

    fn render(&mut self) -> Result<()> {
        if !self.ui.needs_redraw() {
            return Ok(());
        }

        let start = Instant::now();
        let engine = &mut self.engine;
        let ui = &self.ui;
        let renderer = &mut self.ui_renderer;

        self.terminal
            .draw(|frame: &mut Frame<'_>| renderer.render(frame, engine, ui))
            .context("Failed to draw terminal")?;

        self.ui.clear_redraw();

        let duration = start.elapsed();
        if duration.as_millis() > 16 {
            warn!("Slow render: {}ms (target: <16ms)", duration.as_millis());
        }

        Ok(())
    }

    fn log_final_metrics(&self) {
        let metrics: MetricsSnap = self.event_loop.snapshot_metrics();
        let render_stats = self.ui_renderer.stats();

        info!("Final metrics:");
        info!("  Uptime: {:?}", self.event_loop.uptime());
        info!("  Tasks processed: {}", metrics.tasks);
        info!("  Actions processed: {}", metrics.actions);
        info!("  Actions dispatched: {}", self.dispatcher.dispatched());
        info!("  Average latency: {:?}", metrics.avg);
        info!(
            "  Frames: {} ({} slow, {:.1} fps while drawing)",
            render_stats.frames,
            render_stats.slow,
            render_stats.fps()
        );
        info!("  Visible list recomputes: {}", self.engine.recompute_count());
    }

    fn setup_shutdown_handler(&self) {
        let shutdown: Arc<Notify> = self.shutdown.clone();

        tokio::spawn(async move {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(term), Ok(int)) => (term, int),
                        (Err(e), _) | (_, Err(e)) => {
                            warn!("Failed to install signal handlers: {}", e);
                            return;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                    _ = signal::ctrl_c() => info!("Received Ctrl+C"),
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
                info!("Received Ctrl+C");
            }

            shutdown.notify_one();
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.fetch.abort();
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
