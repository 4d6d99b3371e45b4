use std::collections::BTreeMap;

use adm_store::Product;
use serde::Serialize;

use crate::{DateFilter, stock, trend::percent_change};

/// Revenue and units sold on one calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueDay {
    pub date: String,
    pub revenue: f64,
    pub units: i64,
}

/// Revenue card data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub series: Vec<RevenueDay>,
    pub total_revenue: f64,
    pub percent_change: i64,
}

/// KPI cards above the revenue chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: f64,
    pub units_sold: i64,
    /// Number of individual sale entries
    pub orders: usize,
    /// Products whose remaining stock is at or below the threshold
    pub low_stock_items: usize,
}

/// Accumulate `price × quantity` and `quantity` per sale date.
///
/// The series is sorted by date ascending and `total_revenue` is the sum of
/// the series.
pub fn aggregate_revenue(products: &[Product], filter: &DateFilter) -> RevenueSummary {
    let mut by_date: BTreeMap<&str, RevenueDay> = BTreeMap::new();

    for product in products {
        for sale in product.sales.iter().filter(|s| filter.matches(&s.date)) {
            let day = by_date
                .entry(sale.date.as_str())
                .or_insert_with(|| RevenueDay {
                    date: sale.date.clone(),
                    ..RevenueDay::default()
                });
            day.revenue += product.price * sale.quantity as f64;
            day.units = day.units.saturating_add(sale.quantity);
        }
    }

    let series: Vec<RevenueDay> = by_date.into_values().collect();
    let revenues: Vec<f64> = series.iter().map(|d| d.revenue).collect();

    RevenueSummary {
        // `Sum` for f64 starts from -0.0
        total_revenue: revenues.iter().fold(0.0, |total, day| total + day),
        percent_change: percent_change(&revenues),
        series,
    }
}

/// Headline sales figures for the products matching `filter`, plus the count
/// of products at or below `low_stock_threshold` units left.
pub fn sales_summary(
    products: &[Product],
    filter: &DateFilter,
    low_stock_threshold: i64,
) -> SalesSummary {
    let mut summary = SalesSummary::default();

    for product in products {
        for sale in product.sales.iter().filter(|s| filter.matches(&s.date)) {
            summary.total_revenue += product.price * sale.quantity as f64;
            summary.units_sold = summary.units_sold.saturating_add(sale.quantity);
            summary.orders += 1;
        }
    }

    summary.low_stock_items = stock::low_stock_count(products, low_stock_threshold);
    summary
}
