//! KoboLink TUI - interactive prototype of the onboarding flow
//!
//! Renders the simulated phone-device frame and drives the screen sequence
//! (welcome → phone → otp → profile → security → dashboard, plus login)
//! from keyboard input. A debug control panel below the frame jumps
//! directly to any screen with `F1`-`F7`.
//!
//! All backend actions are simulated: they log to the session log file and,
//! for the code dispatch, advance the screen after a fixed delay.

mod app;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kobolink_core::config::Config;
use kobolink_core::flow::Screen;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;

#[derive(Parser)]
#[command(name = "kobolink")]
#[command(author, version, about = "Terminal prototype of the KoboLink onboarding flow", long_about = None)]
struct Cli {
    /// Screen to start on (welcome, phone, otp, profile, security, dashboard, login)
    #[arg(long)]
    screen: Option<String>,

    /// Event poll cadence in milliseconds (overrides config)
    #[arg(long)]
    tick_rate: Option<u64>,

    /// ASCII-only glyphs for terminals without Unicode box drawing
    #[arg(long)]
    ascii: bool,

    /// Log file path (defaults to kobolink.log in the config directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(tick_rate) = cli.tick_rate {
        config.ui.tick_rate_ms = tick_rate;
    }
    if cli.ascii {
        config.ui.ascii = true;
    }
    config.validate()?;

    let start_screen = cli
        .screen
        .as_deref()
        .map(str::parse::<Screen>)
        .transpose()?;

    init_tracing(cli.log_file.as_deref())?;

    // The runtime hosts the simulated backend's delayed dispatch tasks; the
    // UI loop itself stays synchronous.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, start_screen);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle input
        if event::poll(app.tick_rate())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Paste(text) => app.on_paste(&text),
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = Config::config_dir()?;
            std::fs::create_dir_all(&dir)?;
            dir.join("kobolink.log")
        }
    };
    let file = std::fs::File::options().create(true).append(true).open(&path)?;

    // Logs go to a file so the alternate screen stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("KOBOLINK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kobolink=info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
