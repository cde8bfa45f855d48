//! # survey-tui
//!
//! A terminal dashboard for one batch of Open Trivia DB questions.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use survey_tui::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use survey_tui::app_core::reducer;
use survey_tui::app_core::state::AppState;
use survey_tui::config::{self, Config};
use survey_tui::decode::HtmlEntityDecoder;
use survey_tui::model::Question;
use survey_tui::runtime::native::data::{self, FetchError, LoadEvent};
use survey_tui::{theme, ui};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, mpsc};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const STAGE_DOWNLOADING: &str = "Downloading";
const STAGE_INDEXING: &str = "Indexing";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Survey Visualizer: fetches a batch of trivia questions and charts them \
                  by category and difficulty."
)]
struct Args {
    /// Number of questions to request (1-50)
    #[arg(short, long)]
    amount: Option<u32>,

    /// Question API endpoint
    #[arg(short, long)]
    url: Option<String>,

    /// UI theme (dracula, solarized, gruvbox, everforest_light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Show all paths used by the application (config, data, log)
    #[arg(long)]
    config: bool,

    /// Read settings from this file instead of the default config.toml
    #[arg(long, value_name = "FILE")]
    config_file: Option<PathBuf>,
}

impl Args {
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(amount) = self.amount {
            config.amount = config::clamp_amount(amount);
        }
        if let Some(url) = &self.url {
            config.api_url = url.clone();
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        is_release: false,
    })
}

fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        _ => return None,
    };
    Some(AppMouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
    })
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Sends `tracing` output to a file, since stdout belongs to the terminal UI.
fn init_logging(log_path: &Path, default_level: &str) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    let config_dir = data::get_config_dir()?;
    let data_dir = data::get_data_dir()?;
    let config_path = args
        .config_file
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let log_path = data_dir.join("survey-tui.log");

    if args.config {
        println!("App Paths:");
        println!("  Config:  {}", config_path.display());
        println!("  Data:    {}", data_dir.display());
        println!("  Log:     {}", log_path.display());
        return Ok(());
    }

    let config = args.apply_to(Config::load(&config_path)?);
    init_logging(&log_path, &config.log_level)?;
    tracing::info!(version = %app_version, config = ?config, "starting");

    let theme_enum = theme::Theme::from_str(&config.theme).map_err(anyhow::Error::msg)?;
    let theme = theme_enum.config();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(theme, app_version, Box::new(HtmlEntityDecoder));
    app.start_progress("Loading questions", &[STAGE_DOWNLOADING, STAGE_INDEXING]);

    let loads = data::spawn_fetch(config.request_url());
    let res = run_app(&mut terminal, &mut app, loads);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    loads: mpsc::Receiver<LoadEvent>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let started = Instant::now();
    let mut loading = true;
    terminal.draw(|f| ui::ui(f, app))?;

    loop {
        if app.should_quit {
            break;
        }

        let mut dirty = false;
        if loading {
            while let Some(load_event) = data::next_load_event(&loads) {
                match load_event {
                    LoadEvent::Progress(progress) => {
                        app.update_stage(STAGE_DOWNLOADING, data::progress_ratio(progress));
                    }
                    LoadEvent::Finished(result) => {
                        finish_load(terminal, app, result, started)?;
                        loading = false;
                    }
                }
                dirty = true;
                if !loading {
                    break;
                }
            }
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(event) =
                        crossterm_to_app_key_event(key.code, key.modifiers, key.kind)
                    {
                        reducer::handle_key_event(app, event);
                        dirty = true;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(event) = crossterm_to_app_mouse_event(&mouse) {
                        dirty |= reducer::handle_mouse_event(app, event);
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        if dirty {
            terminal.draw(|f| ui::ui(f, app))?;
        }
    }
    Ok(())
}

/// Builds and installs the index from a finished fetch. A failed fetch installs
/// an empty index and the session carries on without data.
fn finish_load<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    result: Result<Vec<Question>, FetchError>,
    started: Instant,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    app.finish_stage(STAGE_DOWNLOADING);
    terminal.draw(|f| ui::ui(f, app))?;

    let index = data::index_fetch_result(result, app.decoder.as_ref());
    let load_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        questions = index.total_questions(),
        categories = index.categories.len(),
        load_time_ms,
        "index installed"
    );
    app.install_index(index, load_time_ms);

    app.finish_stage(STAGE_INDEXING);
    terminal.draw(|f| ui::ui(f, app))?;
    app.clear_progress();
    Ok(())
}
