use adm_analytics::{remaining_stock, total_sold};
use adm_console::{ConsoleState, ProductForm, ProductManager, SaleDraft, product::load_sale_users};
use adm_store::RecordId;
use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Args, Subcommand};

use super::{or_dash, report_fields};

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List every product, newest first
    List,
    /// Create a product
    Add(ProductFields),
    /// Update a product; a product missing from the store is created instead
    Edit {
        /// Product id
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
    /// Record a sale against a product's stock
    Sell {
        /// Product id
        id: String,
        /// Buyer's user id
        #[arg(long)]
        user: String,
        #[arg(long)]
        quantity: String,
        /// Sale day, yyyy-mm-dd (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a recorded sale from a product
    RemoveSale {
        /// Product id
        id: String,
        /// Sale id
        #[arg(long)]
        sale: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Electronics, Clothing, Books, "Home & Garden", Sports or Other
    #[arg(long)]
    category: Option<String>,
    /// Initial stock
    #[arg(long)]
    quantity: Option<String>,
}

impl ProductFields {
    fn apply(self, form: &mut ProductForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(quantity) = self.quantity {
            form.quantity = quantity;
        }
    }
}

pub async fn execute(state: &ConsoleState, command: ProductCommands) -> Result<()> {
    let mut products = state.product_manager();

    match command {
        ProductCommands::List => {
            products.reload().await?;
            print_products(&products);
        }
        ProductCommands::Add(fields) => {
            products.reload().await?;
            products.open_create();
            save(&mut products, fields).await?;
        }
        ProductCommands::Edit { id, fields } => {
            products.reload().await?;
            products.open_edit(&RecordId::from_key(&id));
            save(&mut products, fields).await?;
        }
        ProductCommands::Delete { id } => {
            products.delete(&RecordId::from_key(&id)).await?;
        }
        ProductCommands::Sell {
            id,
            user,
            quantity,
            date,
        } => {
            open_existing(&mut products, &id).await?;

            let users = load_sale_users(&state.client).await;
            let mut draft = SaleDraft::new(Utc::now().date_naive());
            draft.user_id = user;
            draft.quantity = quantity;
            if let Some(date) = date {
                draft.date = date;
            }

            let sale = products.add_sale(&draft, &users).inspect_err(report_fields)?;
            products.submit().await.inspect_err(report_fields)?;

            if let Some(product) = products.find(&RecordId::from_key(&id)) {
                println!(
                    "Recorded sale {} ({} units). Remaining stock: {}",
                    sale.id,
                    sale.quantity,
                    remaining_stock(product.quantity, &product.sales)
                );
            }
        }
        ProductCommands::RemoveSale { id, sale } => {
            open_existing(&mut products, &id).await?;

            if !products.remove_sale(&RecordId::from_key(&sale)) {
                bail!("Product {id} has no sale {sale}");
            }
            products.submit().await.inspect_err(report_fields)?;
        }
    }

    Ok(())
}

/// Load the products and open the edit form of one that exists.
async fn open_existing(products: &mut ProductManager, id: &str) -> Result<()> {
    products.reload().await?;

    let id = RecordId::from_key(id);
    if products.find(&id).is_none() {
        bail!("Product {id} not found");
    }

    products.open_edit(&id);
    Ok(())
}

async fn save(products: &mut ProductManager, fields: ProductFields) -> Result<()> {
    if let Some(form) = products.form_mut() {
        fields.apply(form);
    }

    products.submit().await.inspect_err(report_fields)?;
    Ok(())
}

fn print_products(products: &ProductManager) {
    println!(
        "{:<8} {:<28} {:>10} {:<14} {:>6} {:>6} {:>9} {}",
        "ID", "NAME", "PRICE", "CATEGORY", "STOCK", "SOLD", "REMAINING", "CREATED"
    );

    for product in products.records() {
        println!(
            "{:<8} {:<28} {:>10.2} {:<14} {:>6} {:>6} {:>9} {}",
            product.id.as_key(),
            product.name,
            product.price,
            or_dash(product.category.as_deref()),
            product.quantity,
            total_sold(&product.sales),
            remaining_stock(product.quantity, &product.sales),
            or_dash(product.created_at.as_deref()),
        );
    }

    println!("Total Products: {}", products.records().len());
}
