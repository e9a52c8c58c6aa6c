// src/main.rs
mod app;
mod clipboard;
mod config;
mod highlight;
mod input;
mod markdown;
mod models;
mod network;
mod theme;
mod ui;
mod utils;

use std::{fs, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::{Handle, Runtime};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::clipboard::SystemClipboard;
use crate::config::Settings;
use crate::input::handle_key;
use crate::models::{Language, ThemeMode};
use crate::network::ExplainClient;

/// Terminal code editor that asks an AI service to explain your code.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// File to load into the editor instead of the placeholder
    file: Option<PathBuf>,

    /// Base URL of the explanation service (overrides config and CODEXPLAIN_API_BASE_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Highlighting language, e.g. python, rust, cpp
    #[arg(short, long, value_parser = parse_language)]
    language: Option<Language>,

    /// Start in light or dark mode
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,
}

fn parse_language(s: &str) -> Result<Language, String> {
    Language::from_value(s).ok_or_else(|| {
        let known: Vec<&str> = Language::ALL.iter().map(|l| l.value()).collect();
        format!("unknown language '{}', expected one of: {}", s, known.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let user_config = config::ensure_user_config().context("could not create user config")?;
    let settings = Settings::new(user_config.as_deref())?;
    init_logging(&settings.log_path())?;

    let code = cli
        .file
        .as_ref()
        .map(|path| fs::read_to_string(path).with_context(|| format!("could not read {}", path.display())))
        .transpose()?;
    let language = cli
        .language
        .or_else(|| cli.file.as_deref().and_then(Language::from_path))
        .unwrap_or(settings.default_language);
    let theme = cli.theme.unwrap_or(settings.theme);
    let api_base_url = cli.api_url.or(settings.api_base_url);

    match &api_base_url {
        Some(url) => info!(%url, %language, ?theme, "starting"),
        None => warn!("no API base URL configured, explain requests will fail"),
    }

    let rt = Runtime::new()?;
    let mut app = App::new(
        ExplainClient::new(api_base_url.as_deref()),
        language,
        theme,
        code,
        Box::new(SystemClipboard::default()),
    );

    terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, rt.handle());

    app.shutdown();
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    rt.shutdown_timeout(Duration::from_millis(200));
    info!("bye");
    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, rt: &Handle) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !handle_key(key, app, rt)? {
                    return Ok(());
                }
            }
        }
    }
}

/// Logs go to a file, the terminal belongs to the UI.
fn init_logging(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
