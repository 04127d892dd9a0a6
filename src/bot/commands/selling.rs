//! Selling commands - `/sell` for one-tap sales and `/sale` for multi-item carts.
//!
//! `/sell` behaves like tapping a product on the counter: with no sale open it
//! sells one unit right away, and while a sale is open it puts one unit in the
//! cart instead. Nothing in the cart touches stock until `/sale pay`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{DESCRIPTION_LIMIT, find_product, fit_lines, reply_or_fail},
            handlers::autocomplete,
        },
        core::{
            cart::Cart,
            engine::{CartAdjustment, ProductAction},
            report::format_peso,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Sells one unit, or adds one to the cart while a sale is open.
    #[poise::command(slash_command)]
    pub async fn sell(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to sell"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
    ) -> Result<()> {
        let outcome = {
            let mut shop = ctx.data().shop.lock().await;
            match find_product(&shop.engine().state().catalog, &product).map(|p| p.id) {
                Ok(id) => shop.product_action(id).await.map(|action| {
                    let remaining = shop
                        .engine()
                        .state()
                        .catalog
                        .find_by_id(id)
                        .map_or(0, |p| p.stock);
                    (action, remaining)
                }),
                Err(e) => Err(e),
            }
        };

        match outcome {
            Ok((ProductAction::Sold(sale), remaining)) => {
                ctx.say(format!(
                    "✅ Sold 1 × **{}** for **{}** (profit {}). {remaining} left.",
                    sale.product_name,
                    format_peso(sale.selling_price),
                    format_peso(sale.profit),
                ))
                .await?;
                Ok(())
            }
            Ok((ProductAction::AddedToCart(qty), _)) => {
                ctx.say(format!("🛒 Added **{product}** to the cart (now ×{qty})."))
                    .await?;
                Ok(())
            }
            Err(e) => reply_or_fail(ctx, e).await,
        }
    }

    /// Parent command for multi-item sales.
    #[poise::command(
        slash_command,
        subcommands(
            "sale_start",
            "sale_add",
            "sale_cart",
            "sale_adjust",
            "sale_pay",
            "sale_cancel"
        )
    )]
    pub async fn sale(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Sale commands:\n\
            `/sale start` - Open a new cart\n\
            `/sale add` - Put one unit of a product in the cart\n\
            `/sale cart` - Show the cart\n\
            `/sale adjust` - Change how many of a product are in the cart\n\
            `/sale pay` - Finish the sale and update stock\n\
            `/sale cancel` - Drop the cart without selling anything";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Opens an empty cart.
    #[poise::command(slash_command, rename = "start")]
    pub async fn sale_start(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let result = ctx.data().shop.lock().await.start_transaction();
        match result {
            Ok(()) => {
                ctx.say("🛒 New sale started. Use `/sell` or `/sale add` to add items, then `/sale pay`.")
                    .await?;
                Ok(())
            }
            Err(e) => reply_or_fail(ctx, e).await,
        }
    }

    /// Adds one unit of a product to the open cart.
    #[poise::command(slash_command, rename = "add")]
    pub async fn sale_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to add"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
    ) -> Result<()> {
        let result = {
            let mut shop = ctx.data().shop.lock().await;
            find_product(&shop.engine().state().catalog, &product)
                .map(|p| p.id)
                .and_then(|id| shop.add_to_cart(id))
        };

        match result {
            Ok(qty) => {
                ctx.say(format!("🛒 Added **{product}** to the cart (now ×{qty})."))
                    .await?;
                Ok(())
            }
            Err(e) => reply_or_fail(ctx, e).await,
        }
    }

    /// Shows the items in the open cart and the amount due.
    #[poise::command(slash_command, rename = "cart")]
    pub async fn sale_cart(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let cart = ctx.data().shop.lock().await.engine().cart().cloned();
        let Some(cart) = cart else {
            ctx.say("No sale in progress. Start one with `/sale start`.")
                .await?;
            return Ok(());
        };

        ctx.send(poise::CreateReply::default().embed(cart_embed("**Current sale**", &cart)))
            .await?;
        Ok(())
    }

    /// Changes the quantity of a product in the cart. Going to zero removes it.
    #[poise::command(slash_command, rename = "adjust")]
    pub async fn sale_adjust(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product in the cart"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: String,
        #[description = "How many to add (e.g., 2) or take away (e.g., -1)"] change: i64,
    ) -> Result<()> {
        let result = {
            let mut shop = ctx.data().shop.lock().await;
            find_product(&shop.engine().state().catalog, &product)
                .map(|p| p.id)
                .and_then(|id| shop.adjust_cart_item(id, change))
        };

        match result {
            Ok(CartAdjustment::Updated(qty)) => {
                ctx.say(format!("🛒 **{product}** is now ×{qty} in the cart."))
                    .await?;
                Ok(())
            }
            Ok(CartAdjustment::Removed) => {
                ctx.say(format!("🛒 Removed **{product}** from the cart."))
                    .await?;
                Ok(())
            }
            Err(e) => reply_or_fail(ctx, e).await,
        }
    }

    /// Completes the sale: every item is sold together or none is.
    #[poise::command(slash_command, rename = "pay")]
    pub async fn sale_pay(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let result = ctx.data().shop.lock().await.finalize_transaction().await;
        let record = match result {
            Ok(record) => record,
            Err(e) => return reply_or_fail(ctx, e).await,
        };

        let lines: Vec<String> = record
            .items
            .iter()
            .map(|line| {
                format!(
                    "{} × {} @ {} = {}",
                    line.qty,
                    line.name,
                    format_peso(line.price),
                    format_peso(f64::from(line.qty) * line.price)
                )
            })
            .collect();

        let receipt = serenity::CreateEmbed::default()
            .title("**✅ Sale complete**")
            .color(0x0057_F287) // Discord green
            .description(fit_lines(lines, DESCRIPTION_LIMIT))
            .fields(vec![
                ("Total", format_peso(record.total_revenue), true),
                ("Profit", format_peso(record.total_profit), true),
            ])
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Receipt #{}",
                record.id
            )));

        ctx.send(poise::CreateReply::default().embed(receipt))
            .await?;
        Ok(())
    }

    /// Drops the open cart. Stock and sales are not touched.
    #[poise::command(slash_command, rename = "cancel")]
    pub async fn sale_cancel(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let result = ctx.data().shop.lock().await.cancel_transaction();
        match result {
            Ok(cart) => {
                ctx.say(format!(
                    "🗑️ Sale cancelled, {} item(s) put back.",
                    cart.total_items()
                ))
                .await?;
                Ok(())
            }
            Err(e) => reply_or_fail(ctx, e).await,
        }
    }

    fn cart_embed(title: &str, cart: &Cart) -> serenity::CreateEmbed {
        let description = if cart.is_empty() {
            "The cart is empty.".to_string()
        } else {
            let lines = cart
                .items()
                .iter()
                .map(|item| {
                    format!(
                        "{} × {} @ {} = {}",
                        item.qty,
                        item.name,
                        format_peso(item.price),
                        format_peso(item.line_total())
                    )
                })
                .collect();
            fit_lines(lines, DESCRIPTION_LIMIT)
        };

        serenity::CreateEmbed::default()
            .title(title)
            .color(0x0058_65F2)
            .description(description)
            .fields(vec![
                ("Items", cart.total_items().to_string(), true),
                ("Total", format_peso(cart.total_amount()), true),
            ])
    }
}

// Re-export all commands
pub use inner::*;
