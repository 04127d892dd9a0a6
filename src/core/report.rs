//! Report generation business logic.
//!
//! Read-only views over [`StoreState`]: today's statistics header, dashboard
//! KPIs, the seven-day sales series and margin badges. All functions are
//! framework-agnostic and return structured data that the bot layer formats.
//! Days are bucketed by the machine's local date.

use crate::core::{
    catalog::Catalog,
    engine::StoreState,
    ledger::SalesLedger,
    model::{Product, SaleRecord},
};
use chrono::{DateTime, Days, Local, NaiveDate, Utc};

/// Number of days in the dashboard series, today included.
pub const SERIES_DAYS: u64 = 7;

/// Statistics header for a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    /// Products in the catalog, regardless of stock
    pub total_products: usize,
    /// Units sold that day
    pub units_sold: usize,
    /// Sum of selling prices of that day's sales
    pub revenue: f64,
    /// Sum of profit of that day's sales
    pub profit: f64,
}

/// Dashboard KPIs computed from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    /// Σ stock × cost price
    pub inventory_value: f64,
    /// Products with `0 < stock <= threshold`
    pub items_at_risk: usize,
    /// Products with no stock left
    pub out_of_stock: usize,
}

/// One point of the seven-day series.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTotals {
    /// Local calendar day
    pub date: NaiveDate,
    /// Revenue for the day
    pub sales: f64,
    /// Profit for the day
    pub profit: f64,
}

/// Margin badge level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginTier {
    /// Under 20%
    Low,
    /// 20% up to 40%
    Medium,
    /// 40% and above
    High,
}

impl MarginTier {
    /// Tier for a margin percentage.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent < 20.0 {
            Self::Low
        } else if percent < 40.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low margin",
            Self::Medium => "Medium margin",
            Self::High => "High margin",
        }
    }

    /// Badge emoji.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Low => "🔴",
            Self::Medium => "🟡",
            Self::High => "🟢",
        }
    }

    /// One-line key for the badges, lowest tier first.
    #[must_use]
    pub fn legend() -> String {
        [Self::Low, Self::Medium, Self::High]
            .iter()
            .map(|tier| format!("{} {}", tier.emoji(), tier.label()))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

/// Local calendar day of a stored timestamp.
#[must_use]
pub fn local_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// Today's local date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn sales_on(ledger: &SalesLedger, day: NaiveDate) -> impl Iterator<Item = &SaleRecord> {
    ledger
        .records()
        .iter()
        .filter(move |sale| local_day(sale.timestamp) == day)
}

/// Statistics header for `day`.
#[must_use]
pub fn daily_summary(state: &StoreState, day: NaiveDate) -> DailySummary {
    let (units_sold, revenue, profit) = sales_on(&state.ledger, day).fold(
        (0, 0.0, 0.0),
        |(units, revenue, profit), sale| (units + 1, revenue + sale.selling_price, profit + sale.profit),
    );
    DailySummary {
        total_products: state.catalog.len(),
        units_sold,
        revenue,
        profit,
    }
}

/// Dashboard KPIs. `threshold` is the low-stock limit from the store settings.
#[must_use]
pub fn dashboard_metrics(catalog: &Catalog, threshold: u32) -> DashboardMetrics {
    let products = catalog.products();
    DashboardMetrics {
        inventory_value: products
            .iter()
            .map(|p| f64::from(p.stock) * p.cost_price)
            .sum(),
        items_at_risk: at_risk_products(catalog, threshold).len(),
        out_of_stock: products.iter().filter(|p| p.stock == 0).count(),
    }
}

/// Products running low, lowest stock first.
#[must_use]
pub fn at_risk_products(catalog: &Catalog, threshold: u32) -> Vec<&Product> {
    let mut products: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|p| p.stock > 0 && p.stock <= threshold)
        .collect();
    products.sort_by_key(|p| p.stock);
    products
}

/// Sales and profit per day for the seven days ending on `today`, oldest
/// first. Days without sales are present with zero totals.
#[must_use]
pub fn weekly_series(ledger: &SalesLedger, today: NaiveDate) -> Vec<DayTotals> {
    (0..SERIES_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let (sales, profit) = sales_on(ledger, date).fold((0.0, 0.0), |(s, p), sale| {
                (s + sale.selling_price, p + sale.profit)
            });
            DayTotals {
                date,
                sales,
                profit,
            }
        })
        .collect()
}

/// Markup over cost as a percentage. Zero when cost is zero.
#[must_use]
pub fn margin_percent(cost_price: f64, selling_price: f64) -> f64 {
    if cost_price == 0.0 {
        return 0.0;
    }
    (selling_price - cost_price) / cost_price * 100.0
}

/// Margin badge for a product.
#[must_use]
pub fn product_margin(product: &Product) -> (f64, MarginTier) {
    let percent = margin_percent(product.cost_price, product.selling_price);
    (percent, MarginTier::from_percent(percent))
}

/// Formats an amount in pesos, like "₱1,234.50" or "-₱25.00".
#[must_use]
pub fn format_peso(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}₱{grouped}.{cents}")
}

/// Text bar of remaining stock against initial stock, like `[███░░░░░░░] 3/10`.
#[must_use]
pub fn format_stock_bar(stock: u32, initial_stock: u32, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let fraction = if initial_stock == 0 {
        0.0
    } else {
        (f64::from(stock) / f64::from(initial_stock)).clamp(0.0, 1.0)
    };

    // fraction is in [0, 1] and length is small, so the product fits a usize
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (fraction * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}] {stock}/{initial_stock}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        engine::Engine,
        model::{Category, ProductDraft},
    };
    use chrono::{NaiveTime, TimeZone};

    fn noon_on(day: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&day.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()))
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sale(price: f64, cost: f64, at: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            transaction_id: None,
            product_id: 1,
            product_name: "Lucky Me Pancit Canton".to_string(),
            selling_price: price,
            cost_price: cost,
            profit: price - cost,
            timestamp: at,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_summary_counts_only_that_day() {
        let today = day(2025, 3, 14);
        let yesterday = day(2025, 3, 13);
        let mut engine = Engine::new(StoreState::default());
        engine.add_product(ProductDraft::new("Coke", Category::Beverages, 15.0, 20.0, 10).unwrap());

        let mut state = engine.state().clone();
        state.ledger = SalesLedger::from_records(vec![
            sale(20.0, 15.0, noon_on(today)),
            sale(20.0, 15.0, noon_on(today)),
            sale(99.0, 1.0, noon_on(yesterday)),
        ]);

        let summary = daily_summary(&state, today);
        assert_eq!(summary.total_products, 1);
        assert_eq!(summary.units_sold, 2);
        assert_eq!(summary.revenue, 40.0);
        assert_eq!(summary.profit, 10.0);
    }

    #[test]
    fn test_dashboard_metrics() {
        let mut engine = Engine::new(StoreState::default());
        engine.add_product(ProductDraft::new("Sardines", Category::Canned, 18.0, 22.0, 4).unwrap());
        engine.add_product(ProductDraft::new("Rice Noodles", Category::Noodles, 10.0, 13.0, 50).unwrap());
        engine.add_product(ProductDraft::new("Matches", Category::Household, 1.0, 2.0, 0).unwrap());
        engine.add_product(ProductDraft::new("Nescafe", Category::Coffee, 5.0, 7.0, 5).unwrap());

        let metrics = dashboard_metrics(&engine.state().catalog, 5);
        assert_eq!(metrics.inventory_value, 4.0 * 18.0 + 50.0 * 10.0 + 5.0 * 5.0);
        assert_eq!(metrics.items_at_risk, 2);
        assert_eq!(metrics.out_of_stock, 1);

        let at_risk = at_risk_products(&engine.state().catalog, 5);
        assert_eq!(at_risk[0].name, "Sardines");
        assert_eq!(at_risk[1].name, "Nescafe");
    }

    #[test]
    fn test_weekly_series_is_oldest_first_and_zero_filled() {
        let today = day(2025, 3, 14);
        let ledger = SalesLedger::from_records(vec![
            sale(20.0, 15.0, noon_on(today)),
            sale(10.0, 8.0, noon_on(day(2025, 3, 8))),
            // Outside the window
            sale(50.0, 10.0, noon_on(day(2025, 3, 7))),
        ]);

        let series = weekly_series(&ledger, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, day(2025, 3, 8));
        assert_eq!(series[0].sales, 10.0);
        assert_eq!(series[0].profit, 2.0);
        assert_eq!(series[3].sales, 0.0);
        assert_eq!(series[6].date, today);
        assert_eq!(series[6].sales, 20.0);
        assert_eq!(series[6].profit, 5.0);
    }

    #[test]
    fn test_margin_percent_and_tiers() {
        assert!((margin_percent(15.0, 20.0) - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(margin_percent(0.0, 20.0), 0.0);
        assert_eq!(MarginTier::from_percent(19.9), MarginTier::Low);
        assert_eq!(MarginTier::from_percent(20.0), MarginTier::Medium);
        assert_eq!(MarginTier::from_percent(39.9), MarginTier::Medium);
        assert_eq!(MarginTier::from_percent(40.0), MarginTier::High);
        assert_eq!(MarginTier::from_percent(-10.0), MarginTier::Low);
        assert_eq!(
            MarginTier::legend(),
            "🔴 Low margin · 🟡 Medium margin · 🟢 High margin"
        );
    }

    #[test]
    fn test_format_peso() {
        assert_eq!(format_peso(0.0), "₱0.00");
        assert_eq!(format_peso(5.5), "₱5.50");
        assert_eq!(format_peso(1234.5), "₱1,234.50");
        assert_eq!(format_peso(1_000_000.0), "₱1,000,000.00");
        assert_eq!(format_peso(-25.0), "-₱25.00");
    }

    #[test]
    fn test_format_stock_bar() {
        assert_eq!(format_stock_bar(10, 10, Some(10)), "[██████████] 10/10");
        assert_eq!(format_stock_bar(3, 10, Some(10)), "[███░░░░░░░] 3/10");
        assert_eq!(format_stock_bar(0, 0, Some(5)), "[░░░░░] 0/0");
    }
}
