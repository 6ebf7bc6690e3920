mod app;
mod commands;
mod connectivity;
mod sources;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use screenwatch_core::config::DashboardConfig;
use screenwatch_core::source::SnapshotSource;

use app::{App, Flow};
use sources::{DemoSource, FileSource};

const LOG_ENV: &str = "SCREENWATCH_LOG";
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "screenwatch")]
#[command(about = "Status dashboard for a digital-signage player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: search for screenwatch.yaml upwards from cwd)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data endpoint, overriding the config
    #[arg(long, global = true, conflicts_with_all = ["file", "demo"])]
    url: Option<String>,

    /// Read the snapshot from a saved response body
    #[arg(long, global = true, conflicts_with = "demo")]
    file: Option<PathBuf>,

    /// Use built-in sample data
    #[arg(long, global = true)]
    demo: bool,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// High contrast palette
    #[arg(long, global = true)]
    high_contrast: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard (default)
    Tui,
    /// Fetch once and print the figures
    Summary,
    /// Validate a saved response body
    Check { path: PathBuf },
}

fn init_logging(log_file: Option<&Path>, interactive: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                return;
            }
            Err(e) => eprintln!("log file {}: {}", path.display(), e),
        }
    }

    // the TUI owns the terminal
    if interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    }
}

fn load_config(explicit: Option<&Path>) -> Result<DashboardConfig, String> {
    if let Some(path) = explicit {
        return DashboardConfig::load(path).map_err(|e| format!("{}: {}", path.display(), e));
    }

    let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
    match DashboardConfig::discover(&cwd).map_err(|e| e.to_string())? {
        Some((path, config)) => {
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(DashboardConfig::default()),
    }
}

fn build_source(cli: &Cli, config: &DashboardConfig) -> Result<Arc<dyn SnapshotSource>, String> {
    if cli.demo {
        return Ok(Arc::new(DemoSource::new()));
    }
    if let Some(path) = &cli.file {
        return Ok(Arc::new(FileSource::new(path)));
    }
    let endpoint = cli.url.as_deref().unwrap_or(&config.endpoint);
    http_source(endpoint)
}

#[cfg(feature = "http")]
fn http_source(endpoint: &str) -> Result<Arc<dyn SnapshotSource>, String> {
    Ok(Arc::new(sources::HttpSource::new(endpoint)))
}

#[cfg(not(feature = "http"))]
fn http_source(endpoint: &str) -> Result<Arc<dyn SnapshotSource>, String> {
    Err(format!(
        "built without the `http` feature; use --file or --demo instead of {}",
        endpoint
    ))
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(cli.log_file.as_deref(), interactive);

    if let Some(Commands::Check { path }) = &cli.command {
        return match commands::run_check(path) {
            Ok(()) => Ok(()),
            Err(e) => exit_with(e),
        };
    }

    let config = load_config(cli.config.as_deref()).unwrap_or_else(|e| exit_with(e));
    let source = build_source(&cli, &config).unwrap_or_else(|e| exit_with(e));

    match cli.command {
        Some(Commands::Summary) => match commands::run_summary(source, &config).await {
            Ok(()) => Ok(()),
            Err(e) => exit_with(e),
        },
        _ => {
            let probe_endpoint = (cli.file.is_none() && !cli.demo)
                .then(|| cli.url.clone().unwrap_or_else(|| config.endpoint.clone()));
            run_tui(config, source, probe_endpoint, cli.high_contrast).await
        }
    }
}

// --- Terminal setup/teardown ---
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_tui(
    config: DashboardConfig,
    source: Arc<dyn SnapshotSource>,
    probe_endpoint: Option<String>,
    high_contrast: bool,
) -> io::Result<()> {
    ui::theme::install(high_contrast);

    let mut app = App::new(config, source);
    if let Some(endpoint) = probe_endpoint.filter(|_| app.config.connectivity.enabled) {
        connectivity::spawn_probe(
            &endpoint,
            Duration::from_millis(app.config.connectivity.interval_ms),
            app.event_sender(),
            app.id_counter(),
        );
    }
    app.refresh();

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app);
    restore_terminal(terminal)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.drain();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let CEvent::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key.code, key.modifiers) == Flow::Quit {
                tracing::info!("quit");
                return Ok(());
            }
        }
    }
}
