use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Serialize;
use validator::ValidateEmail;

/// Validation messages keyed by form field
///
/// Every failing field is reported at once; a field holds at most one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one field check, keeping the first message.
    pub fn check<T>(&mut self, field: &'static str, outcome: Result<T, String>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\''
}

/// Validate a person's display name (trimmed, 2 to 50 characters)
pub fn validate_person_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    let length = name.chars().count();

    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if length < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }
    if length > 50 {
        return Err("Name must be less than 50 characters".to_string());
    }
    if !name.chars().all(is_name_char) {
        return Err("Name can only contain letters, spaces, hyphens, and apostrophes".to_string());
    }

    Ok(())
}

/// Validate a product name (trimmed, 2 to 100 characters, digits allowed)
pub fn validate_product_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    let length = name.chars().count();

    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if length < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }
    if length > 100 {
        return Err("Name must be less than 100 characters".to_string());
    }
    if !name.chars().all(|c| is_name_char(c) || c.is_ascii_digit()) {
        return Err(
            "Product name can only contain letters, numbers, spaces, hyphens, and apostrophes"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate email format using the validator crate
///
/// The domain part must also contain a dot, so `someone@localhost` is refused.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();

    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    let has_dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));

    if !email.validate_email() || !has_dotted_domain {
        return Err("Please enter a valid email address".to_string());
    }

    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
    let length = description.trim().chars().count();

    if length == 0 {
        return Err("Description is required".to_string());
    }
    if length < 10 {
        return Err("Description must be at least 10 characters".to_string());
    }
    if length > 500 {
        return Err("Description must be less than 500 characters".to_string());
    }

    Ok(())
}

/// Parse a numeric form input; `None` for blank or non-numeric text.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Validate a unit price: positive and at most 999,999
pub fn validate_price(raw: &str) -> Result<f64, String> {
    if raw.trim().is_empty() {
        return Err("Price is required".to_string());
    }

    match parse_number(raw) {
        Some(price) if price > 0.0 => {
            if price > 999_999.0 {
                Err("Price must be less than 1,000,000".to_string())
            } else {
                Ok(price)
            }
        }
        _ => Err("Price must be a positive number".to_string()),
    }
}

/// Validate a stock quantity: a whole number, zero or more
pub fn validate_quantity(raw: &str) -> Result<i64, String> {
    let Some(quantity) = parse_number(raw) else {
        return Err("Quantity is required".to_string());
    };

    if quantity < 0.0 {
        return Err("Quantity must be 0 or greater".to_string());
    }
    if quantity.fract() != 0.0 || !quantity.is_finite() {
        return Err("Quantity must be an integer".to_string());
    }

    Ok(quantity as i64)
}

/// Parse a required choice among fixed labels
///
/// # Examples
/// ```
/// use adm_console::validation::validate_choice;
/// use adm_store::Gender;
///
/// assert_eq!(validate_choice::<Gender>("Female", "Gender"), Ok(Gender::Female));
/// assert!(validate_choice::<Gender>("", "Gender").is_err());
/// ```
pub fn validate_choice<T: FromStr>(raw: &str, label: &str) -> Result<T, String> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(format!("{label} is required"));
    }

    raw.parse()
        .map_err(|_| format!("{label} '{raw}' is not one of the available options"))
}
