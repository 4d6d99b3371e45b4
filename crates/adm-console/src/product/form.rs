use std::cmp::Ordering;

use adm_store::{Product, ProductCategory, Sale, models::parse_timestamp};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use crate::{
    manager::{FormMode, Managed},
    validation::{
        FieldErrors, parse_number, validate_choice, validate_description, validate_price,
        validate_product_name, validate_quantity,
    },
};

/// Create/edit form for a product. Numbers are kept as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub quantity: String,
    /// Draft list of sales, saved together with the product
    pub sales: Vec<Sale>,
}

fn created_millis(product: &Product) -> i64 {
    product
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .map(|t| t.timestamp_millis())
        .unwrap_or(0)
}

/// Newest first; equal or missing timestamps fall back to id, descending.
pub(crate) fn newest_first(a: &Product, b: &Product) -> Ordering {
    created_millis(b)
        .cmp(&created_millis(a))
        .then_with(|| b.id.as_key().cmp(&a.id.as_key()))
}

impl Managed for Product {
    const TITLE: &'static str = "Product";
    const NOUN: &'static str = "product";

    type Form = ProductForm;

    fn to_form(&self) -> ProductForm {
        ProductForm {
            name: self.name.clone(),
            price: self.price.to_string(),
            description: self.description.clone(),
            category: self.category.clone().unwrap_or_default(),
            quantity: self.quantity.to_string(),
            sales: self.sales.clone(),
        }
    }

    fn validate(form: &ProductForm, _mode: &FormMode, _loaded: &[Product]) -> FieldErrors {
        let mut errors = FieldErrors::new();

        errors.check("name", validate_product_name(&form.name));
        errors.check("price", validate_price(&form.price));
        errors.check("description", validate_description(&form.description));
        errors.check(
            "category",
            validate_choice::<ProductCategory>(&form.category, "Category"),
        );
        errors.check("quantity", validate_quantity(&form.quantity));

        errors
    }

    fn payload(form: &ProductForm) -> Map<String, Value> {
        let price = parse_number(&form.price).unwrap_or(0.0);
        let quantity = parse_number(&form.quantity).map_or(0, |q| q as i64);

        let payload = json!({
            "name": form.name.trim(),
            "price": price,
            "description": form.description.trim(),
            "category": form.category.trim(),
            "quantity": quantity,
            "sales": form.sales,
        });

        match payload {
            Value::Object(fields) => fields,
            _ => Map::new(),
        }
    }

    fn stamp_new(payload: &mut Map<String, Value>) {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        payload.insert("createdAt".to_string(), Value::String(now));
    }

    fn arrange(records: &mut [Product]) {
        records.sort_by(newest_first);
    }
}
