//! Store settings commands - `/store`, `/export` and `/clear_all`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::export::{ExportBundle, export_file_name},
        core::report::today,
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    /// Shows the store name and how much data it holds.
    #[poise::command(slash_command)]
    pub async fn store(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let (products, sales, transactions, open_cart, dirty) = {
            let shop = ctx.data().shop.lock().await;
            let state = shop.engine().state();
            (
                state.catalog.len(),
                state.ledger.len(),
                state.log.len(),
                shop.engine().is_transaction_open(),
                shop.is_dirty(),
            )
        };

        let mut store_embed = serenity::CreateEmbed::default()
            .title(format!("**🏪 {}**", ctx.data().config.store_name))
            .color(0x0058_65F2)
            .fields(vec![
                ("Products", products.to_string(), true),
                ("Units sold", sales.to_string(), true),
                ("Multi-item sales", transactions.to_string(), true),
                (
                    "Sale in progress",
                    if open_cart { "Yes" } else { "No" }.to_string(),
                    true,
                ),
                (
                    "Low-stock alert at",
                    ctx.data().config.low_stock_threshold.to_string(),
                    true,
                ),
            ]);
        if dirty {
            store_embed = store_embed.footer(serenity::CreateEmbedFooter::new(
                "⚠️ The last save failed. Recent changes are only in memory.",
            ));
        }

        ctx.send(poise::CreateReply::default().embed(store_embed))
            .await?;
        Ok(())
    }

    /// Downloads a JSON backup of products, sales and receipts.
    #[poise::command(slash_command)]
    pub async fn export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let json = {
            let shop = ctx.data().shop.lock().await;
            ExportBundle::new(shop.engine().state(), Utc::now()).to_json_pretty()?
        };
        let file_name = export_file_name(today());
        tracing::info!(bytes = json.len(), "Exporting store backup");

        ctx.send(
            poise::CreateReply::default()
                .content(format!("📦 Backup ready: `{file_name}`"))
                .attachment(serenity::CreateAttachment::bytes(json.into_bytes(), file_name)),
        )
        .await?;
        Ok(())
    }

    /// Deletes ALL products, sales and receipts. Needs two confirmations.
    #[poise::command(slash_command)]
    pub async fn clear_all(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Yes, delete all products, sales and receipts"] confirm: bool,
        #[description = "Yes, I understand this cannot be undone"] confirm_again: bool,
    ) -> Result<()> {
        if !(confirm && confirm_again) {
            ctx.say("Nothing was deleted. Set both confirmations to True to clear all data.")
                .await?;
            return Ok(());
        }

        ctx.data().shop.lock().await.clear_all().await;
        tracing::warn!(user = %ctx.author().name, "All store data cleared");
        ctx.say("🗑️ All products, sales and receipts have been deleted.")
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
