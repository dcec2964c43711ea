mod action;
mod app;
mod clipboard;
mod config;
mod dispatch;
mod error;
mod event;
mod forge;
mod github;
mod items;
mod list;
mod prompt;
mod tui;
mod types;
mod ui;
mod viewport;

use std::fs::{self, File};
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::clipboard::SystemClipboard;
use crate::config::{Config, USAGE};
use crate::dispatch::Dispatcher;
use crate::event::Event;
use crate::forge::Forge;
use crate::github::GitHub;
use crate::tui::EventHandler;

/// Browse pull request review comments and copy them as AI assistant prompts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Cli::parse();
    dotenv::dotenv().ok();
    init_logging();

    let config = Config::load();
    let token = match config.resolve_token() {
        Ok(token) => token,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    let github = GitHub::new(token, Duration::from_secs(config.github.timeout_secs))?;
    tracing::info!(forge = github.name(), "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(Arc::new(github), &config).await;

    tui::restore()?;

    result
}

/// The terminal belongs to the UI, so logs go to a file in the cache dir.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let file = dirs::cache_dir()
        .map(|dir| dir.join("nitpick"))
        .and_then(|dir| {
            fs::create_dir_all(&dir).ok()?;
            File::create(dir.join("nitpick.log")).ok()
        });

    let registry = tracing_subscriber::registry().with(filter);
    match file {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
            .init(),
    }
}

async fn run(forge: Arc<dyn Forge>, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let clipboard = Arc::new(SystemClipboard::new());
    let mut dispatcher = Dispatcher::new(forge, clipboard, action_tx.clone());
    let mut app = App::new(&config.ui);

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16);
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                for command in app.update(action) {
                    dispatcher.dispatch(command);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
