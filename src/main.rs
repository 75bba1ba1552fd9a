//! CLI entry point for themewright.

mod cli;

use clap::Parser;
use cli::{Args, Command};
use std::sync::Arc;
use themewright::api::ApiClient;
use themewright::assistant::{Assistant, AssistantSettings};
use themewright::catalog::Catalog;
use themewright::config::{
    initialize_default_global_config, load_config, Config, GlobalConfigInitResult,
};
use themewright::error::ConfigError;
use themewright::repl::{self, Renderer};
use themewright::server;
use themewright::session::Session;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Some(Command::Init { force }) = &args.command {
        std::process::exit(match run_init(*force) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("error: {e}");
                1
            }
        });
    }

    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut config = loaded.config;

    // Apply CLI overrides.
    if let Some(model) = &args.model {
        config.api.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }
    if args.no_color {
        config.display.color = false;
    }

    themewright::logging::init(&config.logging, config.display.color);
    tracing::debug!(source = ?loaded.source, "configuration loaded");

    if let Err(e) = run(args.command, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Option<Command>, config: Config) -> Result<(), String> {
    let assistant = build_assistant(&config).map_err(|e| e.to_string())?;
    let renderer = Renderer::new(config.display.color);

    match command {
        Some(Command::Serve { addr }) => {
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            let cors = server::cors_layer(&config.server.cors_origin).map_err(|e| e.to_string())?;
            let app = server::router(Arc::new(assistant), cors);
            server::serve(&addr, app)
                .await
                .map_err(|e| format!("server on {addr} failed: {e}"))
        }
        Some(Command::Exec { message }) => {
            let mut session = new_session(&config);
            let outcome = session
                .turn(&assistant, &message)
                .await
                .map_err(|e| e.user_message())?;
            for line in renderer.turn(&outcome) {
                println!("{line}");
            }
            Ok(())
        }
        Some(Command::Init { .. }) => Ok(()),
        None => {
            let mut session = new_session(&config);
            repl::run(&mut session, &assistant, renderer)
                .await
                .map_err(|e| format!("terminal i/o failed: {e}"))
        }
    }
}

fn build_assistant(config: &Config) -> Result<Assistant, ConfigError> {
    let catalog = Catalog::load(
        config.catalog.variables.as_deref(),
        config.catalog.configs.as_deref(),
    )?;
    if config.api.api_key.is_empty() {
        tracing::warn!("no API key configured; requests are sent without authorization");
    }
    Ok(Assistant::new(
        Box::new(ApiClient::new(&config.api)),
        catalog,
        AssistantSettings::from_config(config),
    ))
}

fn new_session(config: &Config) -> Session {
    Session::new(
        config.widget.baseline_snapshot(),
        config.widget.render_target(),
    )
}

fn run_init(force: bool) -> Result<(), String> {
    match initialize_default_global_config(force)
        .map_err(|e| format!("failed to initialize config: {e}"))?
    {
        GlobalConfigInitResult::Created { path } => {
            eprintln!("initialized themewright config at {}", path.display());
            Ok(())
        }
        GlobalConfigInitResult::Overwritten { path, backup_path } => {
            eprintln!(
                "reinitialized themewright config at {} (backup: {})",
                path.display(),
                backup_path.display()
            );
            Ok(())
        }
        GlobalConfigInitResult::AlreadyInitialized { path } => Err(format!(
            "themewright is already initialized at {}. Use `themewright init --force` to overwrite.",
            path.display()
        )),
    }
}
