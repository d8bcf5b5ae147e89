//! Terminal grid front end.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{clamp_cursor, move_cursor};

use crate::client::{ChannelRenderer, ChannelStatusSink, ClientEvent, GameClient, UserCommand};
use crate::config::ClientConfig;
use crate::http_transport::HttpTransport;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Log file used while the terminal is in raw mode.
pub const LOG_FILE: &str = "squares_client.log";

/// Runs the terminal UI until the user quits.
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so tracing output does not tear the screen
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), "Starting squares TUI");

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let client = GameClient::new(
        HttpTransport::new(config.server_url().clone()),
        ChannelRenderer::new(event_tx.clone()),
        ChannelStatusSink::new(event_tx),
    )
    .with_request_timeout(config.request_timeout());
    let client_handle = tokio::spawn(client.run(command_rx));

    let app = App::new(config.game_setup());
    command_tx.send(UserCommand::NewGame(app.setup()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, app, &command_tx, &mut event_rx).await;

    // Closing the channel ends the client loop as well
    let _ = command_tx.send(UserCommand::Quit);
    drop(command_tx);
    if let Err(e) = client_handle.await {
        error!(error = %e, "Game client task failed");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "TUI loop error");
        eprintln!("Error: {:?}", err);
    }
    Ok(())
}

#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    command_tx: &mpsc::UnboundedSender<UserCommand>,
    event_rx: &mut mpsc::UnboundedReceiver<ClientEvent>,
) -> Result<()> {
    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(command) = app.handle_key(key.code)
        {
            command_tx.send(command)?;
        }

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }

        // Let the client task make progress between frames
        tokio::task::yield_now().await;
    }
}
