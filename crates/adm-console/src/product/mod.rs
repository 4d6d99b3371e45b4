//! Product console, including the sales entered on a product's form

mod form;
mod sales;

pub use form::ProductForm;
pub use sales::SaleDraft;

use adm_store::{Product, StoreClient, User, repository};

use crate::manager::RecordManager;

pub type ProductManager = RecordManager<Product>;

/// Users offered as buyers when entering sales.
///
/// Loaded separately from the user console; an unreachable store yields an
/// empty list and the ledger falls back to raw user ids.
pub async fn load_sale_users(client: &StoreClient) -> Vec<User> {
    match repository::list::<User>(client).await {
        Ok(users) => users,
        Err(e) => {
            tracing::warn!("Could not load users for sale entry: {e}");
            Vec::new()
        }
    }
}
