//! Pantrybot binary: WhatsApp inventory bot.
//!
//! `pantrybot start` runs the relay loop; `pantrybot qr` and
//! `pantrybot status` are one-shot helpers for pairing the bridge.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pantrybot::config::{BotConfig, ConfigSource};
use pantrybot::groq::completions::GroqClient;
use pantrybot::relay::Relay;
use pantrybot::whatsapp::client::WhatsAppClient;
use pantrybot::whatsapp::events::spawn_event_listener;

/// Buffer size for the WhatsApp event channel.
const EVENT_CHANNEL_SIZE: usize = 100;

#[derive(Parser)]
#[command(name = "pantrybot", version, about = "WhatsApp inventory bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bot (default).
    Start,
    /// Print the WhatsApp pairing QR code from the bridge.
    Qr,
    /// Show the bridge connection status.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Counterpart of the original .env loading; missing file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging comes up before config so load-time diagnostics are captured;
    // `start` defers to the file-backed subscriber and logs the source then.
    match cli.command.unwrap_or(Command::Start) {
        Command::Start => {
            let (config, source) = BotConfig::load().context("failed to load configuration")?;
            start(config, source).await
        }
        Command::Qr => {
            pantrybot::logging::init_cli();
            let (config, source) = BotConfig::load().context("failed to load configuration")?;
            debug!(?source, "configuration loaded");
            let client = WhatsAppClient::with_port(config.whatsapp.bridge_port);
            let qr = client.get_qr().await.context("failed to fetch QR code")?;
            println!("{qr}");
            Ok(())
        }
        Command::Status => {
            pantrybot::logging::init_cli();
            let (config, source) = BotConfig::load().context("failed to load configuration")?;
            debug!(?source, "configuration loaded");
            let client = WhatsAppClient::with_port(config.whatsapp.bridge_port);
            let status = client.status().await.context("failed to fetch status")?;
            println!(
                "connected: {} phone: {}",
                status.connected,
                status.phone_number.as_deref().unwrap_or("-")
            );
            Ok(())
        }
    }
}

/// Run the relay loop until ctrl-c or the event channel closes.
async fn start(config: BotConfig, source: ConfigSource) -> Result<()> {
    let _logging_guard = pantrybot::logging::init_production(Path::new(&config.paths.logs_dir))?;

    info!(
        ?source,
        model = %config.llm.model,
        bridge_port = config.whatsapp.bridge_port,
        session_db = %config.paths.session_db,
        "pantrybot starting"
    );

    if config.llm.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; every extraction will fail until it is provided");
    }

    let whatsapp = Arc::new(WhatsAppClient::with_port(config.whatsapp.bridge_port));
    whatsapp
        .wait_healthy()
        .await
        .context("WhatsApp bridge is not reachable")?;

    let status = whatsapp.status().await?;
    if !status.connected {
        warn!("bridge is running but not paired; run `pantrybot qr` and scan the code");
    }

    let extractor = Arc::new(GroqClient::with_base_url(
        config.llm.model.clone(),
        config.llm.api_key.clone(),
        pantrybot::groq::completions::GROQ_API_BASE.to_owned(),
    ));

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
    let listener = spawn_event_listener(whatsapp.base_url().to_owned(), event_tx);

    let relay = Relay::new(Arc::clone(&whatsapp), extractor);

    tokio::select! {
        () = relay.run(event_rx) => {
            info!("relay finished");
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for ctrl-c")?;
            info!("shutdown signal received");
        }
    }

    listener.abort();
    Ok(())
}
