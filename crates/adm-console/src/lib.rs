//! Admin console over the mock record store
//!
//! Configuration, logging, the user and product managers with their forms,
//! the dashboard composer and the store document maintenance.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod maintenance;
pub mod manager;
pub mod notification;
pub mod product;
pub mod state;
pub mod tracing;
pub mod user;
pub mod validation;

pub use config::{ConsoleConfig, Environment};
pub use dashboard::{Dashboard, DashboardFeed};
pub use error::{ConsoleError, WriteAction};
pub use manager::{FormMode, LoadState, Managed, Modal, ModalPhase, RecordManager};
pub use notification::{Notification, Notifier, Severity};
pub use product::{ProductForm, ProductManager, SaleDraft};
pub use state::ConsoleState;
pub use user::{UserForm, UserManager};
pub use validation::FieldErrors;
