use adm_store::{Product, RecordId, Sale};
use serde::Serialize;
use thiserror::Error;

/// A sale asked for more units than the product has left.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Quantity exceeds available stock. Remaining: {remaining}")]
pub struct StockShortfall {
    pub requested: i64,
    pub remaining: i64,
}

/// Units sold vs units left for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub product_id: RecordId,
    pub name: String,
    pub sold: i64,
    pub stock: i64,
}

/// Units across every sale, saturating instead of overflowing.
pub fn total_sold(sales: &[Sale]) -> i64 {
    sales
        .iter()
        .fold(0i64, |total, s| total.saturating_add(s.quantity))
}

/// `max(0, quantity - Σ sale.quantity)`
pub fn remaining_stock(quantity: i64, sales: &[Sale]) -> i64 {
    quantity.saturating_sub(total_sold(sales)).max(0)
}

/// Check that a new sale of `requested` units fits in the remaining stock.
///
/// Returns the stock left once the sale is recorded.
pub fn check_sale(quantity: i64, sales: &[Sale], requested: i64) -> Result<i64, StockShortfall> {
    let remaining = remaining_stock(quantity, sales);
    if requested > remaining {
        return Err(StockShortfall {
            requested,
            remaining,
        });
    }
    Ok(remaining.saturating_sub(requested))
}

/// Sold and remaining units per product, in catalogue order.
pub fn sold_vs_stock(products: &[Product]) -> Vec<ProductStock> {
    products
        .iter()
        .map(|p| ProductStock {
            product_id: p.id.clone(),
            name: p.name.clone(),
            sold: total_sold(&p.sales),
            stock: remaining_stock(p.quantity, &p.sales),
        })
        .collect()
}

/// Products with `threshold` units or fewer left.
pub fn low_stock_count(products: &[Product], threshold: i64) -> usize {
    products
        .iter()
        .filter(|p| remaining_stock(p.quantity, &p.sales) <= threshold)
        .count()
}
