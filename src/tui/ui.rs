use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::app::{App, ChatJob, StatusLevel, UiEvent};
use super::command::{parse_command, Command};
use super::render::render_ui;
use crate::constants::{
    UI_EVENT_CHANNEL_CAPACITY, UI_PAGE_SCROLL_LINES, UI_REFRESH_INTERVAL_MS, UI_SCROLL_LINES,
};
use crate::runtime::ChatController;

/// Run the terminal UI
pub async fn run_ui(mut app: App) -> Result<()> {
    // Check if we have an interactive terminal
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        eprintln!("❌ docchat requires an interactive terminal.");
        eprintln!("   For scripted use, pass a question with --prompt.");
        return Err(anyhow::anyhow!("No interactive terminal available"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (tx, mut rx) = mpsc::channel::<UiEvent>(UI_EVENT_CHANNEL_CAPACITY);

    let res = run_app(&mut terminal, &mut app, tx, &mut rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("UI loop failed: {:#}", err);
    }

    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<UiEvent>,
    rx: &mut mpsc::Receiver<UiEvent>,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(UI_REFRESH_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key, &tx);
                }
            }
        }

        // Apply finished background work
        while let Ok(ui_event) = rx.try_recv() {
            app.apply_event(ui_event);
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<UiEvent>) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match key.code {
        KeyCode::Enter => {
            if let Some(command) = app.input.strip_prefix(':') {
                let command = parse_command(command);
                app.clear_input();
                run_command(app, command, tx);
            } else if let Some(job) = app.submit_message() {
                spawn_chat(app.controller.clone(), job, tx.clone());
            }
        }
        KeyCode::Esc => {
            app.clear_input();
            app.clear_status();
            app.help_visible = false;
        }
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => app.scroll_up(UI_SCROLL_LINES),
        KeyCode::Down => app.scroll_down(UI_SCROLL_LINES),
        KeyCode::PageUp => app.scroll_up(UI_PAGE_SCROLL_LINES),
        KeyCode::PageDown => app.scroll_down(UI_PAGE_SCROLL_LINES),
        _ => {}
    }
}

fn run_command(app: &mut App, command: Command, tx: &mpsc::Sender<UiEvent>) {
    match command {
        Command::Quit => app.quit(),
        Command::Help => app.show_help(),
        Command::Upload(path) => {
            if app.begin_upload(&path) {
                spawn_upload(app.controller.clone(), path, tx.clone());
            }
        }
        Command::UploadUsage => {
            app.set_status(StatusLevel::Warning, "Usage: :upload <path>");
        }
        Command::Document => match app.session.active_document().map(str::to_string) {
            Some(id) => app.set_status(
                StatusLevel::Info,
                format!("Current Document Hash Code: {}", id),
            ),
            None => app.set_status(StatusLevel::Info, "No document uploaded yet"),
        },
        Command::NewSession => app.new_session(),
        Command::TogglePanel => app.toggle_document_panel(),
        Command::Unknown(text) => {
            app.set_status(StatusLevel::Warning, format!("Unknown command: {}", text));
        }
    }
}

fn spawn_chat(controller: ChatController, job: ChatJob, tx: mpsc::Sender<UiEvent>) {
    tokio::spawn(async move {
        let result = controller
            .reply(&job.prompt, job.document_id.as_deref())
            .await;
        if tx.send(UiEvent::ChatReply(result)).await.is_err() {
            info!("UI closed before chat reply arrived");
        }
    });
}

fn spawn_upload(controller: ChatController, path: PathBuf, tx: mpsc::Sender<UiEvent>) {
    tokio::spawn(async move {
        let result = controller.upload_document(&path).await;
        if tx.send(UiEvent::UploadFinished { path, result }).await.is_err() {
            info!("UI closed before upload finished");
        }
    });
}
