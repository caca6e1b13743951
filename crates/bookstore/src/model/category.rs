use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_framework::not_blank;
use validator::Validate;

/// A catalog category. Deleting one clears the reference on its books.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<CategoryCreate> for CategoryUpdate {
    fn from(c: CategoryCreate) -> Self {
        Self {
            name: Some(c.name),
            description: Some(c.description),
        }
    }
}

impl Category {
    pub fn apply(&mut self, update: CategoryUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }
}
