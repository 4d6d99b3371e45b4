use std::{fmt, path::PathBuf};

use adm_analytics::StockShortfall;
use adm_store::StoreError;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Which write a failed save or delete was attempting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    /// Create issued because an edited record was no longer in the store
    UpsertCreate,
    Delete,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::UpsertCreate => "Create (upsert)",
            Self::Delete => "Delete",
        })
    }
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Load {collection} failed: {source}")]
    Load {
        collection: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("Please fix the highlighted fields: {0}")]
    Validation(FieldErrors),
    #[error("Lookup failed: {0}")]
    Lookup(#[source] StoreError),
    #[error("{action} failed: {source}")]
    Write {
        action: WriteAction,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    StockExceeded(#[from] StockShortfall),
    #[error("Please fix sale entry fields.")]
    InvalidSale(FieldErrors),
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),
    #[error("No form is open")]
    NoOpenForm,
    #[error("Store client error: {0}")]
    Store(#[from] StoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// True when the store could not be reached or answered with something
    /// other than JSON.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Load { source, .. } | Self::Lookup(source) | Self::Write { source, .. } => {
                matches!(source, StoreError::Transport(_) | StoreError::Client(_))
            }
            Self::Store(source) => matches!(source, StoreError::Transport(_) | StoreError::Client(_)),
            _ => false,
        }
    }

    /// Field-level messages, for validation failures.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) | Self::InvalidSale(errors) => Some(errors),
            _ => None,
        }
    }
}
