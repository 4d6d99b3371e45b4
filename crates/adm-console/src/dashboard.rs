//! Dashboard view: every card computed from one snapshot of users and products.

use adm_analytics::{
    CategoryCount, DateFilter, GenderSlice, LedgerPage, ProductStock, RevenueSummary, SaleRow,
    SalesSummary, SessionSummary, UserStats, aggregate_revenue, aggregate_sessions,
    category_counts, gender_counts, ledger, sales_ledger, sales_summary, stock, user_stats,
};
use adm_store::{Product, User};
use serde::Serialize;
use tokio::sync::watch;

use crate::{product::ProductManager, user::UserManager};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub filter: DateFilter,
    pub stats: UserStats,
    /// Revenue, units and orders for the selected day
    pub sales: SalesSummary,
    pub sessions: SessionSummary,
    pub revenue: RevenueSummary,
    pub categories: Vec<CategoryCount>,
    pub genders: Vec<GenderSlice>,
    pub stock: Vec<ProductStock>,
    /// Sales of the selected day, newest first
    pub ledger: Vec<SaleRow>,
    /// Every sale date, newest first, regardless of the filter
    pub sale_dates: Vec<String>,
}

impl Dashboard {
    pub fn compose(
        users: &[User],
        products: &[Product],
        filter: DateFilter,
        low_stock_threshold: i64,
    ) -> Self {
        let mut all_rows = sales_ledger(users, products, &DateFilter::All);
        ledger::sort_newest_first(&mut all_rows);
        let sale_dates = ledger::unique_dates(&all_rows);

        let rows = all_rows
            .into_iter()
            .filter(|row| filter.matches(&row.date))
            .collect();

        Self {
            stats: user_stats(users, products),
            sales: sales_summary(products, &filter, low_stock_threshold),
            sessions: aggregate_sessions(products),
            revenue: aggregate_revenue(products, &filter),
            categories: category_counts(products),
            genders: gender_counts(users),
            stock: stock::sold_vs_stock(products),
            ledger: rows,
            sale_dates,
            filter,
        }
    }

    /// One page of the ledger. A page size of zero or less shows every row.
    pub fn ledger_page(&self, page: usize, page_size: i64) -> LedgerPage {
        let size = usize::try_from(page_size).ok().filter(|size| *size > 0);
        ledger::paginate(self.ledger.clone(), page, size)
    }
}

/// Recomputes the dashboard whenever either manager commits a new collection.
#[derive(Debug)]
pub struct DashboardFeed {
    users: watch::Receiver<Vec<User>>,
    products: watch::Receiver<Vec<Product>>,
    filter: DateFilter,
    low_stock_threshold: i64,
}

impl DashboardFeed {
    pub fn new(users: &UserManager, products: &ProductManager, low_stock_threshold: i64) -> Self {
        Self {
            users: users.subscribe(),
            products: products.subscribe(),
            filter: DateFilter::All,
            low_stock_threshold,
        }
    }

    pub fn set_filter(&mut self, filter: DateFilter) {
        self.filter = filter;
    }

    pub fn current(&self) -> Dashboard {
        let users = self.users.borrow();
        let products = self.products.borrow();
        Dashboard::compose(
            &users,
            &products,
            self.filter.clone(),
            self.low_stock_threshold,
        )
    }

    /// Wait for the next committed change; `None` once a manager is dropped.
    pub async fn changed(&mut self) -> Option<Dashboard> {
        tokio::select! {
            changed = self.users.changed() => changed.ok()?,
            changed = self.products.changed() => changed.ok()?,
        }
        Some(self.current())
    }
}
