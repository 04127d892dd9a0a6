//! Product Discord commands - `/product add`, `/product list` and `/product scan`.
//!
//! This module contains commands for growing the catalog and browsing it. The
//! scan command only suggests values for `/product add`; it never adds a
//! product on its own.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        assist::ProductSuggestion,
        bot::{
            BotData,
            commands::{FIELD_LIMIT, fit_lines, reply_or_fail},
            handlers::autocomplete,
        },
        core::{
            model::{Category, Product, ProductDraft},
            report::{MarginTier, format_peso, format_stock_bar, product_margin},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::sync::Arc;

    /// Attachments above this size are not sent for analysis.
    const MAX_IMAGE_BYTES: u32 = 8 * 1024 * 1024;

    /// Parent command for the product catalog.
    #[poise::command(
        slash_command,
        subcommands("product_add", "product_list", "product_scan")
    )]
    pub async fn product(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Product commands:\n\
            `/product add` - Add a product to the catalog\n\
            `/product list` - Show products by category\n\
            `/product scan` - Suggest product details from a photo";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a product to the catalog with its starting stock.
    #[poise::command(slash_command, rename = "add")]
    pub async fn product_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product name (e.g., 'Coke Mismo')"] name: String,
        #[description = "Shelf category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "What you paid per piece, in pesos"] cost_price: f64,
        #[description = "What you sell one piece for, in pesos"] selling_price: f64,
        #[description = "How many pieces you have now"] initial_stock: i64,
    ) -> Result<()> {
        let draft = match category
            .parse::<Category>()
            .and_then(|category| ProductDraft::new(&name, category, cost_price, selling_price, initial_stock))
        {
            Ok(draft) => draft,
            Err(e) => return reply_or_fail(ctx, e).await,
        };

        let product = ctx.data().shop.lock().await.add_product(draft).await;

        let (margin, tier) = product_margin(&product);
        ctx.say(format!(
            "✅ Added **{}** to {} with {} in stock. Sells for **{}** (cost {}), {} {margin:.0}% margin.",
            product.name,
            product.category.display_name(),
            product.stock,
            format_peso(product.selling_price),
            format_peso(product.cost_price),
            tier.emoji(),
        ))
        .await?;
        Ok(())
    }

    /// Lists products grouped by category, with stock, prices and margins.
    #[poise::command(slash_command, rename = "list")]
    pub async fn product_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only show this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let filter = match category.as_deref().map(str::parse::<Category>).transpose() {
            Ok(filter) => filter,
            Err(e) => return reply_or_fail(ctx, e).await,
        };

        let embed_fields: Vec<(String, String, bool)> = {
            let shop = ctx.data().shop.lock().await;
            shop.engine()
                .state()
                .catalog
                .by_category()
                .into_iter()
                .filter(|(c, _)| filter.is_none_or(|wanted| wanted == *c))
                .map(|(c, products)| {
                    let lines = products.iter().copied().map(product_line).collect();
                    (
                        format!("{} ({})", c.display_name(), products.len()),
                        fit_lines(lines, FIELD_LIMIT),
                        false,
                    )
                })
                .collect()
        };

        if embed_fields.is_empty() {
            let message = filter.map_or_else(
                || "No products yet. Use `/product add` to stock your shelves!".to_string(),
                |c| format!("No products in {c} yet."),
            );
            ctx.say(message).await?;
            return Ok(());
        }

        let list_embed = serenity::CreateEmbed::default()
            .title("**Inventory**")
            .color(0x0058_65F2) // Discord purple
            .fields(embed_fields)
            .footer(serenity::CreateEmbedFooter::new(MarginTier::legend()));

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Suggests a name, category and prices from a product photo.
    #[poise::command(slash_command, rename = "scan")]
    pub async fn product_scan(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Photo of the product"] image: serenity::Attachment,
    ) -> Result<()> {
        let Some(analyzer) = ctx.data().analyzer.as_ref().map(Arc::clone) else {
            ctx.say("❌ Photo analysis is not set up. Ask the owner to configure `GEMINI_API_KEY`.")
                .await?;
            return Ok(());
        };

        let mime_type = image.content_type.clone().unwrap_or_default();
        if !mime_type.starts_with("image/") {
            ctx.say("❌ Please attach an image file.").await?;
            return Ok(());
        }
        if image.size > MAX_IMAGE_BYTES {
            ctx.say("❌ That image is too large. Please use one under 8 MB.")
                .await?;
            return Ok(());
        }

        // Analysis can take longer than Discord's three-second reply window
        ctx.defer().await?;
        let bytes = image.download().await?;

        match analyzer.analyze_image(&bytes, &mime_type).await {
            Ok(suggestion) => {
                ctx.send(poise::CreateReply::default().embed(suggestion_embed(&suggestion)))
                    .await?;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Product photo analysis failed: {e}");
                ctx.say("❌ Could not analyze the product image. Please try again.")
                    .await?;
                Ok(())
            }
        }
    }

    fn product_line(product: &Product) -> String {
        let (margin, tier) = product_margin(product);
        format!(
            "**{}** {} · {} (cost {}) · sold {} · {} {margin:.0}%",
            product.name,
            format_stock_bar(product.stock, product.initial_stock, Some(8)),
            format_peso(product.selling_price),
            format_peso(product.cost_price),
            product.total_sold,
            tier.emoji(),
        )
    }

    fn suggestion_embed(suggestion: &ProductSuggestion) -> serenity::CreateEmbed {
        let hint = format!(
            "`/product add name:{} category:{} cost_price:{:.2} selling_price:{:.2} initial_stock:`",
            suggestion.name,
            suggestion.category.display_name(),
            suggestion.cost_price,
            suggestion.selling_price,
        );
        serenity::CreateEmbed::default()
            .title("**Suggested product**")
            .color(0x0058_65F2)
            .fields(vec![
                ("Name", suggestion.name.clone(), true),
                ("Category", suggestion.category.display_name().to_string(), true),
                ("Cost price", format_peso(suggestion.cost_price), true),
                ("Selling price", format_peso(suggestion.selling_price), true),
                ("Add it with", hint, false),
            ])
            .footer(serenity::CreateEmbedFooter::new(
                "Check the values and fill in your stock before adding.",
            ))
    }
}

// Re-export all commands
pub use inner::*;
