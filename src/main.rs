mod models;
mod commands;
mod services;

use std::env;
use std::error;
use commands::get_framework;
use models::config::{Config, TransferSettings};
use services::bot_init;
use serenity::{
    client::ClientBuilder,
    model::gateway::GatewayIntents
};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

type Error = Box<dyn error::Error + Send + Sync>;
type BotContext<'a> = poise::Context<'a, Data, Error>;

/// Shared state handed to every command.
pub struct Data {
    pub transfer: TransferSettings
}

fn init_logger() -> std::io::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::hourly("logs", "roletransfer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing::subscriber::set_global_default(
        fmt::Subscriber::builder()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .with_ansi(true)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
            .with(fmt::Layer::default().with_writer(non_blocking))
    ).map_err(std::io::Error::other)?;

    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
    info!("Initializing roletransfer v{}", VERSION.unwrap_or("<unknown>"));
    info!("Reading from {}", env::current_dir()?.display());

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Dropping the guard stops the file writer, so it lives as long as main.
    let _guard = match init_logger() {
        Ok(guard) => Some(guard),
        Err(ex) => {
            eprintln!("Failed to initialize logger: {ex}");
            None
        }
    };

    let config = Config::load("config.json").inspect_err(|ex| error!("Failed to load config: {}", ex))?;
    let transfer = config.transfer_settings();
    info!("Transfers require role {} and quarantine with role {}", transfer.required_role, transfer.quarantine_role);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(get_framework(&config.cmd_prefix))
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                bot_init::ready(ctx, ready).await;
                Ok(Data { transfer })
            })
        })
        .build();

    let mut client = ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .inspect_err(|ex| error!("Failed to create client: {}", ex))?;

    if let Err(ex) = client.start().await {
        error!("Discord bot client error: {:?}", ex);
        return Err(ex.into());
    }

    Ok(())
}
