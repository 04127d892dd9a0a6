//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord front end for the store, including all
//! slash commands, autocomplete handlers, and the shared bot context. Commands
//! are thin: they lock the shop, call one operation and format the outcome.

/// Discord command implementations (product, selling, reports, settings, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    assist::{InsightsProvider, ProductAnalyzer},
    config::store::StoreConfig,
    core::{persistence::DatabaseGateway, shop::Shop},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Shared data available to all bot commands.
///
/// The shop sits behind one async mutex, so every command's engine operation
/// runs to completion before the next one starts.
pub struct BotData {
    /// The store
    pub shop: Mutex<Shop<DatabaseGateway>>,
    /// Settings from `config.toml`
    pub config: StoreConfig,
    /// Photo analysis, when an API key is configured
    pub analyzer: Option<Arc<dyn ProductAnalyzer>>,
    /// Dashboard insights, when an API key is configured
    pub insights: Option<Arc<dyn InsightsProvider>>,
}

impl BotData {
    /// Creates the bot context without AI collaborators.
    #[must_use]
    pub fn new(shop: Shop<DatabaseGateway>, config: StoreConfig) -> Self {
        Self {
            shop: Mutex::new(shop),
            config,
            analyzer: None,
            insights: None,
        }
    }

    /// Attaches one client serving both AI collaborators.
    #[must_use]
    pub fn with_assistant<A>(mut self, assistant: Arc<A>) -> Self
    where
        A: ProductAnalyzer + InsightsProvider + 'static,
    {
        self.analyzer = Some(Arc::clone(&assistant) as Arc<dyn ProductAnalyzer>);
        self.insights = Some(assistant as Arc<dyn InsightsProvider>);
        self
    }
}

pub use commands::*;
pub use handlers::*;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error}", ctx.command().name);
            if let Err(e) = ctx.say("❌ Something went wrong. Please try again.").await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
///
/// Commands are registered globally, or only in `DEV_GUILD_ID` when that
/// variable is set, which makes changes show up immediately.
///
/// # Errors
/// Returns an error if the client cannot be built or the gateway connection fails.
pub async fn run_bot(token: &str, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                match dev_guild() {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                            .await?;
                        info!("Registered commands in guild {guild_id}");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Registered commands globally");
                    }
                }
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

fn dev_guild() -> Option<serenity::GuildId> {
    let raw = std::env::var("DEV_GUILD_ID").ok()?;
    match raw.trim().parse::<u64>() {
        Ok(id) if id != 0 => Some(serenity::GuildId::new(id)),
        _ => {
            warn!("Ignoring invalid DEV_GUILD_ID '{raw}'");
            None
        }
    }
}
