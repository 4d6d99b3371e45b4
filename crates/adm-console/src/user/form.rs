use adm_store::{Gender, User, UserCategory};
use serde_json::{Map, Value};

use crate::{
    manager::{FormMode, Managed},
    validation::{FieldErrors, validate_choice, validate_email, validate_person_name},
};

/// Create/edit form for a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub category: String,
}

impl Managed for User {
    const TITLE: &'static str = "User";
    const NOUN: &'static str = "user";

    type Form = UserForm;

    fn to_form(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            gender: self.gender.map(|g| g.to_string()).unwrap_or_default(),
            category: self.category.map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    fn validate(form: &UserForm, mode: &FormMode, loaded: &[User]) -> FieldErrors {
        let mut errors = FieldErrors::new();

        errors.check("name", validate_person_name(&form.name));

        if errors.check("email", validate_email(&form.email)).is_some()
            && *mode == FormMode::Create
        {
            let wanted = form.email.trim().to_lowercase();
            if loaded.iter().any(|u| u.email.to_lowercase() == wanted) {
                errors.add("email", "User with this email already exists");
            }
        }

        errors.check("gender", validate_choice::<Gender>(&form.gender, "Gender"));
        errors.check(
            "category",
            validate_choice::<UserCategory>(&form.category, "Category"),
        );

        errors
    }

    fn payload(form: &UserForm) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("name".to_string(), Value::from(form.name.trim()));
        payload.insert("email".to_string(), Value::from(form.email.trim()));
        payload.insert("gender".to_string(), Value::from(form.gender.trim()));
        payload.insert("category".to_string(), Value::from(form.category.trim()));
        payload
    }
}
