pub mod dashboard;
pub mod maintenance;
pub mod products;
pub mod sales;
pub mod users;

use adm_console::{ConsoleError, FieldErrors};

/// Print field-level messages of a rejected form, one per line.
pub(crate) fn report_fields(err: &ConsoleError) {
    if let Some(fields) = err.field_errors() {
        print_fields(fields);
    }
}

fn print_fields(fields: &FieldErrors) {
    for (field, message) in fields.iter() {
        eprintln!("  {field}: {message}");
    }
}

/// Placeholder for values a record does not carry
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
