use anyhow::Result;
use clap::Args;

use adm_console::ConsoleState;

#[derive(Args, Debug)]
pub struct SalesArgs {
    /// Only sales of this day (yyyy-mm-dd)
    #[arg(long)]
    date: Option<String>,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,
    /// Rows per page; -1 shows every row
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    pub(crate) page_size: i64,
}

pub async fn execute(state: &ConsoleState, args: SalesArgs) -> Result<()> {
    let dashboard = super::dashboard::load(state, args.date.as_deref()).await?;
    let page = dashboard.ledger_page(args.page, args.page_size);

    println!(
        "{:<12} {:<28} {:<20} {:>5} {:>10} {:>10}",
        "DATE", "PRODUCT", "USER", "QTY", "PRICE", "REVENUE"
    );
    for row in &page.rows {
        println!(
            "{:<12} {:<28} {:<20} {:>5} {:>10.2} {:>10.2}",
            row.date, row.product_name, row.user_name, row.quantity, row.price, row.revenue
        );
    }

    println!(
        "Showing {} of {} sales (page {})",
        page.rows.len(),
        page.total,
        page.page
    );
    if !dashboard.sale_dates.is_empty() {
        println!("Dates: {}", dashboard.sale_dates.join(", "));
    }

    Ok(())
}
