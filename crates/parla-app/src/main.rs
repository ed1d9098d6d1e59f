use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use parla_config::Config;
use parla_core::language;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod command;
mod console;
mod controller;
mod events;
mod io;
mod profile;
mod services;
mod state;
mod status;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::services::Services;
use self::state::AppState;

/// Offline-first phrase translator
#[derive(Parser, Debug)]
#[command(name = "parla", version, about)]
struct Args {
    /// User profile to load
    #[arg(long, default_value = "main")]
    profile: String,

    /// Config file to use instead of a profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source language tag, e.g. pt-BR
    #[arg(long)]
    from: Option<String>,

    /// Target language tag, e.g. en-US
    #[arg(long)]
    to: Option<String>,

    /// Start with the online fallback unreachable
    #[arg(long)]
    offline: bool,

    /// Print the supported languages and exit
    #[arg(long)]
    list_languages: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var_os("PARLA_LOG_JSON").is_some() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> Config {
    if let Some(path) = &args.config {
        match profile::load_config_file(path) {
            Ok(config) => return config,
            Err(e) => tracing::warn!("Falling back to defaults: {:#}", e),
        }
        return Config::new();
    }

    if let Err(e) = profile::init_user_config() {
        tracing::warn!("Could not initialize user config: {:#}", e);
    }

    match profile::load_user_profile(&args.profile) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Falling back to defaults: {:#}", e);
            Config::new()
        }
    }
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(from) = &args.from {
        config.session.from_lang = from.clone();
    }
    if let Some(to) = &args.to {
        config.session.to_lang = to.clone();
    }
    if args.offline {
        config.network.start_online = false;
    }

    for code in [&config.session.from_lang, &config.session.to_lang] {
        if !language::contains(code) {
            tracing::warn!("Unsupported language '{}', requests will be refused", code);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    if args.list_languages {
        for entry in language::list_languages() {
            println!("{} {:<6} {}", entry.flag, entry.code, entry.name);
        }
        return Ok(());
    }

    let mut config = load_config(&args);
    apply_overrides(&mut config, &args);
    let capacity = config.channel_capacity;

    let cancel = CancellationToken::new();
    let state = Arc::new(AppState::new(config.clone()));
    let services = Arc::new(Services::from_config(
        &config,
        state.connectivity.clone(),
        &cancel,
    )?);

    {
        let pair = state.languages.read().await;
        tracing::info!(
            "Translating {} → {} ({})",
            pair.source,
            pair.target,
            if state.connectivity.is_online() {
                "online"
            } else {
                "offline"
            }
        );
    }

    let controller = AppController::new(state, capacity, cancel.clone());
    let mut tasks = controller.spawn_tasks(services);

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for ctrl+c: {}", e);
            }
            tracing::info!("Shutdown requested");
        }
        _ = cancel.cancelled() => {
            tracing::info!("Quit");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("Task exited"),
                Ok(Err(e)) => tracing::error!("Task failed: {:#}", e),
                Err(e) => tracing::error!("Task panicked: {}", e),
            }
        }
    }

    controller.shutdown();
    while tasks.join_next().await.is_some() {}

    Ok(())
}
