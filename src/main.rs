#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use sari_pos::{
    assist::gemini::GeminiClient,
    bot::{self, BotData},
    config::{database, store},
    core::{persistence::DatabaseGateway, shop::Shop},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Store settings
    let config = store::load_default_config()
        .inspect_err(|e| error!("Failed to load store settings: {e}"))?;
    info!(store = %config.store_name, "Store settings loaded");

    // 4. Database and saved state
    std::fs::create_dir_all("data")?;
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    let shop = Shop::open(DatabaseGateway::new(db)).await;

    // 5. Optional AI collaborators
    let mut data = BotData::new(shop, config);
    match env::var("GEMINI_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            let client = GeminiClient::new(api_key, &data.config.gemini)?;
            data = data.with_assistant(Arc::new(client));
            info!("AI photo analysis and insights enabled");
        }
        _ => warn!("GEMINI_API_KEY not set; /product scan and /insights are disabled"),
    }

    // 6. Run the bot. The token is read right before use and never stored.
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(&token, data).await
}
