//! Dashboard commands - `/stats` for today's numbers and `/insights` for AI advice.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        assist::InsightSample,
        bot::{BotData, commands::clip_field},
        core::report::{
            at_risk_products, daily_summary, dashboard_metrics, format_peso, today, weekly_series,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::sync::Arc;

    /// Shows today's sales, inventory value, low-stock items and the last seven days.
    #[poise::command(slash_command)]
    pub async fn stats(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let threshold = ctx.data().config.low_stock_threshold;
        let day = today();

        let (summary, metrics, series, at_risk) = {
            let shop = ctx.data().shop.lock().await;
            let state = shop.engine().state();
            let at_risk: Vec<String> = at_risk_products(&state.catalog, threshold)
                .into_iter()
                .take(10)
                .map(|p| format!("{} ({} left)", p.name, p.stock))
                .collect();
            (
                daily_summary(state, day),
                dashboard_metrics(&state.catalog, threshold),
                weekly_series(&state.ledger, day),
                at_risk,
            )
        };

        let week = series
            .iter()
            .map(|point| {
                format!(
                    "`{}` {} · profit {}",
                    point.date.format("%a %d"),
                    format_peso(point.sales),
                    format_peso(point.profit)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let at_risk_text = if at_risk.is_empty() {
            "Nothing is running low.".to_string()
        } else {
            at_risk.join("\n")
        };

        let stats_embed = serenity::CreateEmbed::default()
            .title(format!("**📊 {}**", day.format("%A, %B %-d")))
            .color(0x0058_65F2) // Discord purple
            .fields(vec![
                ("Products", summary.total_products.to_string(), true),
                ("Today's sales", format_peso(summary.revenue), true),
                ("Today's profit", format_peso(summary.profit), true),
                ("Units sold today", summary.units_sold.to_string(), true),
                ("Inventory value", format_peso(metrics.inventory_value), true),
                (
                    "Items at risk",
                    format!("{} (≤ {threshold} left)", metrics.items_at_risk),
                    true,
                ),
                ("Out of stock", metrics.out_of_stock.to_string(), true),
                ("Running low", at_risk_text, false),
                ("Last 7 days", week, false),
            ]);

        ctx.send(poise::CreateReply::default().embed(stats_embed))
            .await?;
        Ok(())
    }

    /// Asks the AI for best sellers, profit analysis and a recommendation.
    #[poise::command(slash_command)]
    pub async fn insights(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(provider) = ctx.data().insights.as_ref().map(Arc::clone) else {
            ctx.say("❌ AI insights are not set up. Ask the owner to configure `GEMINI_API_KEY`.")
                .await?;
            return Ok(());
        };

        // Sample under the lock, then release it before the slow call
        let sample = {
            let shop = ctx.data().shop.lock().await;
            InsightSample::from_state(shop.engine().state(), &ctx.data().config.insights)
        };
        if sample.is_empty() {
            ctx.say("Add some products and make a few sales first, then ask again.")
                .await?;
            return Ok(());
        }

        ctx.defer().await?;
        match provider.generate_insights(&sample).await {
            Ok(insights) => {
                let insights_embed = serenity::CreateEmbed::default()
                    .title("**🤖 Store insights**")
                    .color(0x00FE_E75C) // Discord yellow
                    .fields(vec![
                        ("🏆 Top selling", clip_field(&insights.top_selling), false),
                        ("💰 Profit analysis", clip_field(&insights.profit_analysis), false),
                        ("💡 Recommendation", clip_field(&insights.ai_recommendations), false),
                    ]);
                ctx.send(poise::CreateReply::default().embed(insights_embed))
                    .await?;
            }
            Err(e) => {
                tracing::warn!("Insights request failed: {e}");
                ctx.say("❌ Could not generate AI insights. Please try again later.")
                    .await?;
            }
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
