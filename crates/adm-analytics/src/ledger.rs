use adm_store::{Product, RecordId, User};
use serde::Serialize;

use crate::DateFilter;

/// One sale joined with its product and buyer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub id: RecordId,
    pub product_id: RecordId,
    pub product_name: String,
    pub user_id: RecordId,
    /// Buyer's name, or the raw user id when the buyer is unknown
    pub user_name: String,
    pub quantity: i64,
    pub price: f64,
    pub revenue: f64,
    pub date: String,
}

/// A page of ledger rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPage {
    pub rows: Vec<SaleRow>,
    pub page: usize,
    /// `None` shows every row on a single page
    pub page_size: Option<usize>,
    /// Row count before pagination
    pub total: usize,
}

/// Display name of a user id, falling back to the id itself.
pub fn resolve_user_name(users: &[User], user_id: &RecordId) -> String {
    users
        .iter()
        .find(|u| &u.id == user_id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| user_id.to_string())
}

/// Flatten every product's sales into ledger rows, keeping product order.
pub fn sales_ledger(users: &[User], products: &[Product], filter: &DateFilter) -> Vec<SaleRow> {
    products
        .iter()
        .flat_map(move |product| {
            product
                .sales
                .iter()
                .filter(move |sale| filter.matches(&sale.date))
                .map(move |sale| SaleRow {
                    id: sale.id.clone(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    user_id: sale.user_id.clone(),
                    user_name: resolve_user_name(users, &sale.user_id),
                    quantity: sale.quantity,
                    price: product.price,
                    revenue: product.price * sale.quantity as f64,
                    date: sale.date.clone(),
                })
        })
        .collect()
}

/// Newest sales first; rows of the same day keep their relative order.
pub fn sort_newest_first(rows: &mut [SaleRow]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Distinct sale dates, newest first. Feeds the ledger's date filter.
pub fn unique_dates(rows: &[SaleRow]) -> Vec<String> {
    let mut dates: Vec<String> = rows.iter().map(|r| r.date.clone()).collect();
    dates.sort_by(|a, b| b.cmp(a));
    dates.dedup();
    dates
}

/// Cut one zero-based page out of `rows`; `None` keeps every row.
pub fn paginate(rows: Vec<SaleRow>, page: usize, page_size: Option<usize>) -> LedgerPage {
    let total = rows.len();

    let rows = match page_size {
        Some(size) => rows
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .collect(),
        None => rows,
    };

    LedgerPage {
        rows,
        page,
        page_size,
        total,
    }
}
