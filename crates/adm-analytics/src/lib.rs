//! Dashboard analytics for the admin console
//!
//! This crate turns the flat user and product records of the record store into
//! the derived series the dashboard shows: traffic sessions per day, revenue per
//! day, category and gender distributions, sold-versus-stock per product and the
//! flattened sales ledger. Everything here is a pure function of its inputs and
//! is recomputed whenever the records change.

pub mod distribution;
pub mod ledger;
pub mod revenue;
pub mod sessions;
pub mod stock;
pub mod trend;

use serde::Serialize;

pub use distribution::{
    CategoryCount, GenderSlice, UserStats, category_counts, gender_counts, user_stats,
};
pub use ledger::{LedgerPage, SaleRow, resolve_user_name, sales_ledger};
pub use revenue::{RevenueDay, RevenueSummary, SalesSummary, aggregate_revenue, sales_summary};
pub use sessions::{SessionDay, SessionSummary, aggregate_sessions};
pub use stock::{ProductStock, StockShortfall, check_sale, remaining_stock, total_sold};
pub use trend::percent_change;

/// Single-day filter applied to sale dates.
///
/// Dates are compared as plain `yyyy-mm-dd` strings, without any time zone
/// normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    #[default]
    All,
    Day(String),
}

impl DateFilter {
    /// Build a filter from an optional date; `None`, empty and `"all"` mean no filter.
    pub fn from_option(date: Option<&str>) -> Self {
        match date.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(day) => Self::Day(day.to_string()),
        }
    }

    /// Whether a `yyyy-mm-dd` sale date passes the filter. Dates are compared
    /// verbatim.
    pub fn matches(&self, date: &str) -> bool {
        match self {
            Self::All => true,
            Self::Day(day) => day == date,
        }
    }
}
