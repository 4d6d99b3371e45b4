//! User console

mod form;

pub use form::UserForm;

use adm_store::User;

use crate::manager::RecordManager;

pub type UserManager = RecordManager<User>;
