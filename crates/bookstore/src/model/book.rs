use super::{explicit_null, non_null};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use service_framework::{not_blank, rule, Money};
use validator::{Validate, ValidationError};

/// A catalog entry.
///
/// `category` is the owning category's id; `category_name` is joined in for reads.
/// `stock` is informational: orders check it but nothing decrements it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Money,
    pub category: Option<i64>,
    pub category_name: Option<String>,
    pub stock: i64,
    pub isbn: String,
    pub published_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/books/` and `PUT /api/books/{id}/`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookCreate {
    #[validate(custom = "not_blank")]
    pub title: String,
    #[validate(custom = "not_blank")]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(required(message = "This field may not be null."), custom = "valid_price")]
    pub price: Option<Money>,
    #[serde(default, alias = "category_id")]
    pub category: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub stock: i64,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
}

/// Partial update (PATCH). `category` and `published_date` can be cleared with `null`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct BookUpdate {
    #[validate(custom = "not_blank")]
    pub title: Option<String>,
    #[validate(custom = "not_blank")]
    pub author: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    #[validate(custom = "valid_price")]
    pub price: Option<Money>,
    #[serde(default, alias = "category_id", deserialize_with = "explicit_null")]
    pub category: Option<Option<i64>>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub stock: Option<i64>,
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub published_date: Option<Option<NaiveDate>>,
}

impl From<BookCreate> for BookUpdate {
    fn from(c: BookCreate) -> Self {
        Self {
            title: Some(c.title),
            author: Some(c.author),
            description: Some(c.description),
            price: c.price,
            category: Some(c.category),
            stock: Some(c.stock),
            isbn: Some(c.isbn),
            published_date: Some(c.published_date),
        }
    }
}

impl Book {
    /// Applies the fields present in `update`. `category_name` is refreshed on reload.
    pub fn apply(&mut self, update: BookUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(isbn) = update.isbn {
            self.isbn = isbn;
        }
        if let Some(published_date) = update.published_date {
            self.published_date = published_date;
        }
    }
}

fn valid_price(price: &Money) -> Result<(), ValidationError> {
    if price.is_negative() {
        return Err(rule("min_value", "Ensure this value is greater than or equal to 0."));
    }
    if !price.has_whole_cents() {
        return Err(rule("decimal_places", "Ensure that there are no more than 2 decimal places."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_framework::FieldErrors;

    #[test]
    fn test_create_accepts_category_id_alias_and_string_price() {
        let book: BookCreate = serde_json::from_str(
            r#"{"title": "Dune", "author": "Herbert", "price": "9.99", "category_id": 3}"#,
        )
        .unwrap();
        assert_eq!(book.price, Some("9.99".parse().unwrap()));
        assert_eq!(book.category, Some(3));
        assert_eq!(book.stock, 0);
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_negative_stock_and_fractional_cents_rejected() {
        let book: BookCreate = serde_json::from_str(
            r#"{"title": "Dune", "author": "Herbert", "price": 9.999, "stock": -1}"#,
        )
        .unwrap();
        let errors = FieldErrors::from(book.validate().unwrap_err());
        assert_eq!(
            errors.get("price").unwrap(),
            ["Ensure that there are no more than 2 decimal places."]
        );
        assert!(errors.get("stock").is_some());
    }

    #[test]
    fn test_null_price_is_a_field_error() {
        let book: BookCreate =
            serde_json::from_str(r#"{"title": "Dune", "author": "Herbert", "price": null}"#).unwrap();
        let errors = FieldErrors::from(book.validate().unwrap_err());
        assert_eq!(errors.get("price").unwrap(), ["This field may not be null."]);

        assert!(serde_json::from_str::<BookUpdate>(r#"{"price": null}"#).is_err());
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let cleared: BookUpdate = serde_json::from_str(r#"{"category": null}"#).unwrap();
        let untouched: BookUpdate = serde_json::from_str(r#"{"stock": 4}"#).unwrap();
        assert_eq!(cleared.category, Some(None));
        assert_eq!(untouched.category, None);
    }
}
