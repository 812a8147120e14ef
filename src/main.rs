use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use advisor_core::Config;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Ask the Advisor AGI service for reasoned, ethically checked advice")]
struct Cli {
    /// Base URL of the advisory service (overrides config and ADVISOR_API_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

/// Config file, then environment, then command line.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let mut config = config.with_env_overrides();
    if let Some(url) = &cli.base_url {
        config.base_url = Some(url.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let log_path = logging::init(config.log_level())?;
    tracing::info!(base_url = config.base_url(), log = %log_path.display(), "starting advisor");

    let mut app = App::new(&config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!(error = %e, "advisor exited with an error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event);

        for command in app.take_commands() {
            events.dispatch(&app.client, command);
        }
    }
    Ok(())
}
