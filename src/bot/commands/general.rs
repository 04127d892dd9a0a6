//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't touch the store.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Store Help**\n\
        Here is a summary of all available commands.\n\n\
        **Selling**\n\
        • `/sell <product>` - Sells one piece. During a sale, adds one to the cart instead.\n\
        • `/sale start` - Starts a multi-item sale.\n\
        • `/sale add <product>` - Adds one piece to the cart.\n\
        • `/sale adjust <product> <change>` - Changes a cart quantity (negative to remove).\n\
        • `/sale cart` - Shows the cart and total.\n\
        • `/sale pay` - Completes the sale and updates stock.\n\
        • `/sale cancel` - Drops the cart.\n\n\
        **Products**\n\
        • `/product add` - Adds a product with prices and starting stock.\n\
        • `/product list [category]` - Shows inventory by category.\n\
        • `/product scan <photo>` - Suggests product details from a photo.\n\n\
        **Dashboard**\n\
        • `/stats` - Today's sales, inventory value and the last 7 days.\n\
        • `/insights` - AI tips based on your sales.\n\n\
        **Settings**\n\
        • `/store` - Store name and data summary.\n\
        • `/export` - Downloads a JSON backup.\n\
        • `/clear_all` - Deletes everything (asks twice).\n\
        • `/ping` - Checks if the bot is responsive.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
