use std::io::{self, Stdout};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;

use taskdeck_api::ApiClient;
use taskdeck_core::{AppConfig, Session};

mod app;
mod buffer;
mod chat;
mod constants;
mod filters;
mod form;
mod helpers;
mod theme;

use app::App;
use constants::TICK_RATE;

type Backend = CrosstermBackend<Stdout>;

pub fn run(config: AppConfig, initial_query: Option<String>) -> Result<()> {
    // Logging must be up before the terminal is taken over; stderr is
    // unusable once the alternate screen is active.
    let _log_guard = crate::logging::init(&config)?;

    let session = Session::load(&config.session_path());
    let client = ApiClient::new(config.server_url(), session.auth_cookie.as_deref())?;
    let runtime = Runtime::new().context("failed to start async runtime")?;

    let mut app = App::new(config, client, session, initial_query.as_deref());
    runtime.block_on(app.load_initial());

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    let result = run_app(&mut terminal, &mut app, &runtime);

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    result
}

/// Single-threaded event loop: one key event is handled to completion,
/// including any network round-trip, before the next draw. Mutations can
/// therefore never interleave.
fn run_app(terminal: &mut Terminal<Backend>, app: &mut App, runtime: &Runtime) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| app.draw(f))?;
        if app.should_quit() {
            break;
        }

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_default();

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    runtime.block_on(app.on_key(key))?;
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}
