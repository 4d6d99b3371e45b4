use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::lenient;

/// Identifier assigned by the record store.
///
/// The mock store hands out numeric ids for seeded records and string ids for
/// records it creates itself, so both shapes are kept verbatim and written
/// back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Canonical string form, used in URLs and `?id=` lookups.
    pub fn as_key(&self) -> String {
        self.to_string()
    }

    /// `true` for the placeholder id of entries stored without one.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Read an id typed by a person: integers become numeric ids, anything
    /// else is kept as text.
    pub fn from_key(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(raw.to_string()))
    }
}

/// Blank text id, standing in for an id the store never assigned.
impl Default for RecordId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A record kept in one of the store's top-level collections.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, also the URL path segment (`/users`, `/products`).
    const COLLECTION: &'static str;

    fn id(&self) -> &RecordId;

    /// Raw `createdAt` value, if the record carries one.
    fn created_at(&self) -> Option<&str>;
}

/// Error returned when an enum label is not one of the known values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown label '{0}'")]
pub struct UnknownLabel(pub String);

macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(UnknownLabel(other.to_string())),
                }
            }
        }
    };
}

labelled_enum!(
    /// User gender as stored by the admin forms
    Gender {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
);

labelled_enum!(
    /// User category
    UserCategory {
        Student => "Student",
        Employee => "Employee",
        Other => "Other",
    }
);

labelled_enum!(
    /// Product categories offered by the product form
    ProductCategory {
        Electronics => "Electronics",
        Clothing => "Clothing",
        Books => "Books",
        HomeAndGarden => "Home & Garden",
        Sports => "Sports",
        Other => "Other",
    }
);

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: RecordId,
    /// Display name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Contact email, unique (case-insensitive) at creation time
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: String,
    /// Unknown or missing labels decode as `None`
    #[serde(
        default,
        deserialize_with = "lenient::label",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    #[serde(
        default,
        deserialize_with = "lenient::label",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<UserCategory>,
    /// ISO-8601 creation timestamp, as stored
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    /// Fields this console does not manage, preserved across updates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// A sale embedded in its product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Blank when the stored entry has no id; never written back blank
    #[serde(
        default,
        deserialize_with = "lenient::record_id",
        skip_serializing_if = "RecordId::is_blank"
    )]
    pub id: RecordId,
    /// Buyer; may reference a user that no longer exists, or be missing
    #[serde(
        default,
        deserialize_with = "lenient::record_id",
        skip_serializing_if = "RecordId::is_blank"
    )]
    pub user_id: RecordId,
    #[serde(default, deserialize_with = "lenient::int")]
    pub quantity: i64,
    /// Calendar day of the sale, `yyyy-mm-dd`
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Daily visit counts embedded in a product. Seed data only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub organic: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub referral: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub paid: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Product model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Unit price
    #[serde(default, deserialize_with = "lenient::float")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    /// Free-form on the wire; the product form restricts it to [`ProductCategory`]
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    /// Initial stock; sales are drawn from it
    #[serde(default, deserialize_with = "lenient::int")]
    pub quantity: i64,
    #[serde(
        default,
        deserialize_with = "lenient::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub sales: Vec<Sale>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub traffic: Vec<Traffic>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Parse the date formats found in `createdAt` and `date` fields.
///
/// Accepts RFC 3339 timestamps, naive `yyyy-mm-ddThh:mm:ss[.fff]` timestamps
/// (read as UTC) and bare `yyyy-mm-dd` dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
