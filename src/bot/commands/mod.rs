//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Product catalog commands
pub mod product;

/// Dashboard and AI insight commands
pub mod report;

/// Quick-sell and cart commands
pub mod selling;

/// Store settings, backup and reset commands
pub mod settings;

// Export commands
pub use general::*;
pub use product::*;
pub use report::*;
pub use selling::*;
pub use settings::*;

use crate::{
    bot::BotData,
    core::{catalog::Catalog, model::Product},
    errors::{Error, Result},
};

/// Every slash command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        general::ping(),
        general::help(),
        product::product(),
        selling::sell(),
        selling::sale(),
        report::stats(),
        report::insights(),
        settings::store(),
        settings::export(),
        settings::clear_all(),
    ]
}

/// Replies with a user-facing rejection, or propagates anything else to the
/// framework's error handler.
pub(crate) async fn reply_or_fail(
    ctx: poise::Context<'_, BotData, Error>,
    error: Error,
) -> Result<()> {
    if error.is_user_facing() {
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

/// Looks a product up by the name chosen in autocomplete.
pub(crate) fn find_product<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a Product> {
    catalog
        .find_by_name(name)
        .ok_or_else(|| Error::ProductNotFound {
            name: name.trim().to_string(),
        })
}

/// Discord's limit on an embed field value.
pub(crate) const FIELD_LIMIT: usize = 1024;
/// Discord's limit on an embed description.
pub(crate) const DESCRIPTION_LIMIT: usize = 4096;

/// Shortens `text` to fit an embed field value.
pub(crate) fn clip_field(text: &str) -> String {
    if text.chars().count() <= FIELD_LIMIT {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(FIELD_LIMIT - 1).collect();
    clipped.push('…');
    clipped
}

/// Joins whole lines into at most `limit` bytes, replacing the lines that do
/// not fit with an "…and N more" line.
pub(crate) fn fit_lines(lines: Vec<String>, limit: usize) -> String {
    let total = lines.len();
    let mut value = String::new();
    for (shown, line) in lines.into_iter().enumerate() {
        let more = format!("…and {} more", total - shown);
        if value.len() + line.len() + more.len() + 2 > limit {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(&more);
            return value;
        }
        if !value.is_empty() {
            value.push('\n');
        }
        value.push_str(&line);
    }
    value
}
