use std::collections::HashMap;

use adm_store::{Gender, Product, User};
use serde::Serialize;

/// Bucket for products without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// One slice of the users-by-gender pie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenderSlice {
    pub label: Gender,
    pub value: usize,
}

/// Headline counters of the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: usize,
    pub total_products: usize,
    pub male_users: usize,
    pub female_users: usize,
}

/// Count products per category, in order of first appearance.
pub fn category_counts(products: &[Product]) -> Vec<CategoryCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for product in products {
        let category = product.category.as_deref().unwrap_or(UNCATEGORIZED);
        match positions.get(category) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(category, counts.len());
                counts.push(CategoryCount {
                    category: category.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// Count users per gender. Users without a recognised gender land in `Other`.
pub fn gender_counts(users: &[User]) -> Vec<GenderSlice> {
    Gender::ALL
        .iter()
        .map(|&label| GenderSlice {
            label,
            value: users
                .iter()
                .filter(|u| u.gender.unwrap_or(Gender::Other) == label)
                .count(),
        })
        .collect()
}

pub fn user_stats(users: &[User], products: &[Product]) -> UserStats {
    let count = |gender: Gender| users.iter().filter(|u| u.gender == Some(gender)).count();

    UserStats {
        total_users: users.len(),
        total_products: products.len(),
        male_users: count(Gender::Male),
        female_users: count(Gender::Female),
    }
}
