use adm_analytics::stock;
use adm_store::{Product, RecordId, Sale, User};
use chrono::{NaiveDate, Utc};

use super::ProductForm;
use crate::{
    error::ConsoleError,
    manager::RecordManager,
    validation::{FieldErrors, parse_number},
};

/// The sale entry row under a product form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleDraft {
    pub user_id: String,
    pub quantity: String,
    /// `yyyy-mm-dd`
    pub date: String,
}

impl SaleDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }
}

impl ProductForm {
    /// Stock typed in the form, `0` when it is not a number.
    pub fn stock(&self) -> i64 {
        parse_number(&self.quantity).map_or(0, |q| q as i64)
    }

    pub fn total_sold(&self) -> i64 {
        stock::total_sold(&self.sales)
    }

    pub fn remaining_stock(&self) -> i64 {
        stock::remaining_stock(self.stock(), &self.sales)
    }

    /// Append a sale to the draft list.
    ///
    /// The stock check runs first so an oversized quantity is reported with
    /// the remaining count even when other fields are also wrong. The buyer id
    /// is taken from `users` when it matches one, keeping its stored shape.
    pub fn add_sale(
        &mut self,
        draft: &SaleDraft,
        users: &[User],
        today: NaiveDate,
        now_millis: i64,
    ) -> Result<Sale, ConsoleError> {
        let mut errors = FieldErrors::new();

        let user_key = draft.user_id.trim();
        if user_key.is_empty() {
            errors.add("userId", "User required");
        }

        let quantity = parse_number(&draft.quantity).filter(|q| q.is_finite());
        match quantity {
            Some(q) if q > 0.0 && q.fract() != 0.0 => {
                errors.add("quantity", "Quantity must be a whole number")
            }
            Some(q) if q > 0.0 => {}
            _ => errors.add("quantity", "Quantity must be > 0"),
        }

        let date = draft.date.trim();
        if date.is_empty() {
            errors.add("date", "Date required");
        } else {
            match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                Ok(day) if day > today => errors.add("date", "Date cannot be in the future"),
                Ok(_) => {}
                Err(_) => errors.add("date", "Date must be in yyyy-mm-dd format"),
            }
        }

        if let Some(requested) = quantity {
            stock::check_sale(self.stock(), &self.sales, requested.ceil() as i64)?;
        }

        if !errors.is_empty() {
            return Err(ConsoleError::InvalidSale(errors));
        }

        let user_id = users
            .iter()
            .find(|u| u.id.as_key() == user_key)
            .map(|u| u.id.clone())
            .unwrap_or_else(|| RecordId::from_key(user_key));

        let sale = Sale {
            id: RecordId::Text(format!("{user_key}-{date}-{now_millis}")),
            user_id,
            quantity: quantity.map_or(0, |q| q as i64),
            date: date.to_string(),
            ..Sale::default()
        };

        self.sales.push(sale.clone());
        Ok(sale)
    }

    /// Drop a sale from the draft list; `false` when no sale had that id.
    pub fn remove_sale(&mut self, id: &RecordId) -> bool {
        let before = self.sales.len();
        self.sales.retain(|s| &s.id != id);
        self.sales.len() != before
    }
}

impl RecordManager<Product> {
    /// Add a sale to the open product form, notifying on rejection.
    pub fn add_sale(&mut self, draft: &SaleDraft, users: &[User]) -> Result<Sale, ConsoleError> {
        let now = Utc::now();

        let Some(modal) = self.modal_mut() else {
            return Err(ConsoleError::NoOpenForm);
        };

        let outcome = modal
            .form
            .add_sale(draft, users, now.date_naive(), now.timestamp_millis());

        if let Err(err) = &outcome {
            tracing::debug!("Sale entry rejected: {err}");
            self.notifier().error(err.to_string());
        }

        outcome
    }

    pub fn remove_sale(&mut self, id: &RecordId) -> bool {
        self.modal_mut()
            .is_some_and(|modal| modal.form.remove_sale(id))
    }
}
