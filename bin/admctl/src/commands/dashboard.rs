use adm_analytics::DateFilter;
use adm_console::{ConsoleState, Dashboard};
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Restrict revenue and the ledger to one day (yyyy-mm-dd)
    #[arg(long)]
    date: Option<String>,
    /// Print the whole dashboard as JSON
    #[arg(long)]
    json: bool,
}

/// Load users and products and compose the dashboard for one date filter.
pub(crate) async fn load(state: &ConsoleState, date: Option<&str>) -> Result<Dashboard> {
    let mut users = state.user_manager();
    let mut products = state.product_manager();

    users.reload().await?;
    products.reload().await?;

    Ok(Dashboard::compose(
        users.records(),
        products.records(),
        DateFilter::from_option(date),
        state.config.low_stock_threshold,
    ))
}

pub async fn execute(state: &ConsoleState, args: DashboardArgs) -> Result<()> {
    let dashboard = load(state, args.date.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    let stats = &dashboard.stats;
    println!(
        "Users: {}  Products: {}  Male: {}  Female: {}",
        stats.total_users, stats.total_products, stats.male_users, stats.female_users
    );

    let sales = &dashboard.sales;
    println!(
        "Revenue: {:.2}  Units sold: {}  Orders: {}  Low stock: {}",
        sales.total_revenue, sales.units_sold, sales.orders, sales.low_stock_items
    );

    println!(
        "Sessions: {} ({:+}%)  Revenue trend: {:.2} ({:+}%)",
        dashboard.sessions.total_sessions,
        dashboard.sessions.percent_change,
        dashboard.revenue.total_revenue,
        dashboard.revenue.percent_change
    );

    println!();
    println!("Products by category:");
    for entry in &dashboard.categories {
        println!("  {:<16} {}", entry.category, entry.count);
    }

    println!("Users by gender:");
    for slice in &dashboard.genders {
        println!("  {:<16} {}", slice.label.label(), slice.value);
    }

    println!("Sold vs stock:");
    for entry in &dashboard.stock {
        println!("  {:<28} sold {:>5}  left {:>5}", entry.name, entry.sold, entry.stock);
    }

    Ok(())
}
