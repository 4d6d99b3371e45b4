use adm_console::{ConsoleState, UserForm, UserManager};
use adm_store::RecordId;
use anyhow::Result;
use clap::{Args, Subcommand};

use super::{or_dash, report_fields};

#[derive(Subcommand)]
pub enum UserCommands {
    /// List every user
    List,
    /// Create a user
    Add(UserFields),
    /// Update a user; a user missing from the store is created instead
    Edit {
        /// User id
        id: String,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user
    Delete {
        /// User id
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct UserFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Male, Female or Other
    #[arg(long)]
    gender: Option<String>,
    /// Student, Employee or Other
    #[arg(long)]
    category: Option<String>,
}

impl UserFields {
    fn apply(self, form: &mut UserForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(email) = self.email {
            form.email = email;
        }
        if let Some(gender) = self.gender {
            form.gender = gender;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
    }
}

pub async fn execute(state: &ConsoleState, command: UserCommands) -> Result<()> {
    let mut users = state.user_manager();

    match command {
        UserCommands::List => {
            users.reload().await?;
            print_users(&users);
        }
        UserCommands::Add(fields) => {
            users.reload().await?;
            users.open_create();
            save(&mut users, fields).await?;
        }
        UserCommands::Edit { id, fields } => {
            users.reload().await?;
            users.open_edit(&RecordId::from_key(&id));
            save(&mut users, fields).await?;
        }
        UserCommands::Delete { id } => {
            users.delete(&RecordId::from_key(&id)).await?;
        }
    }

    Ok(())
}

async fn save(users: &mut UserManager, fields: UserFields) -> Result<()> {
    if let Some(form) = users.form_mut() {
        fields.apply(form);
    }

    users.submit().await.inspect_err(report_fields)?;
    Ok(())
}

fn print_users(users: &UserManager) {
    println!(
        "{:<8} {:<24} {:<30} {:<8} {:<10} {}",
        "ID", "NAME", "EMAIL", "GENDER", "CATEGORY", "CREATED"
    );

    for user in users.records() {
        println!(
            "{:<8} {:<24} {:<30} {:<8} {:<10} {}",
            user.id.as_key(),
            user.name,
            user.email,
            user.gender.map_or("-", |g| g.label()),
            user.category.map_or("-", |c| c.label()),
            or_dash(user.created_at.as_deref()),
        );
    }

    println!("Total Users: {}", users.records().len());
}
