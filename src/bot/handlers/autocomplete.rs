//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for product names and
//! categories, so users pick values the store actually knows.

use crate::{bot::BotData, core::model::Category, errors::Error};

/// Discord shows at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

/// Provides autocomplete suggestions for product names.
///
/// Matches the partial input anywhere in the name, ignoring case, and returns
/// up to 25 names sorted alphabetically.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let shop = ctx.data().shop.lock().await;
    matching_names(
        shop.engine()
            .state()
            .catalog
            .products()
            .iter()
            .map(|p| p.name.as_str()),
        partial,
    )
}

/// Provides autocomplete suggestions for category names, in display order.
pub async fn autocomplete_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_categories(partial)
}

fn matching_categories(partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    Category::ALL
        .iter()
        .filter(|c| {
            c.display_name().to_lowercase().contains(&partial_lower) || c.key().contains(&partial_lower)
        })
        .map(|c| c.display_name().to_string())
        .collect()
}

fn matching_names<'a>(names: impl Iterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = names
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort_by_key(|name| name.to_lowercase());
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_filters_and_sorts() {
        let names = ["Coke Mismo", "coffee jelly", "Kopiko", "Nescafe Classic"];
        let matches = matching_names(names.into_iter(), "co");
        assert_eq!(matches, vec!["coffee jelly", "Coke Mismo"]);

        let matches = matching_names(names.into_iter(), "O");
        assert_eq!(matches, vec!["coffee jelly", "Coke Mismo", "Kopiko"]);
    }

    #[test]
    fn test_matching_categories_by_name_or_key() {
        let all: Vec<String> = Category::ALL
            .iter()
            .map(|c| c.display_name().to_string())
            .collect();
        assert_eq!(matching_categories(""), all);
        assert!(matching_categories("snack").contains(&Category::Snacks.display_name().to_string()));
        assert!(matching_categories("zzz").is_empty());
    }

    #[test]
    fn test_matching_names_caps_suggestions() {
        let names: Vec<String> = (0..40).map(|i| format!("Item {i:02}")).collect();
        let matches = matching_names(names.iter().map(String::as_str), "");
        assert_eq!(matches.len(), MAX_SUGGESTIONS);
        assert_eq!(matches[0], "Item 00");
    }
}
