use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_framework::{not_blank, rule, Money};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Lifecycle of an order. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// A placed order with its line items.
///
/// `total_amount` is computed at creation from the books' prices and never
/// recomputed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub shipping_address: String,
    #[sqlx(skip)]
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order. `price` is the book's price when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    #[serde(skip)]
    pub order_id: i64,
    pub book_id: i64,
    pub quantity: i64,
    pub price: Money,
}

/// Payload for `POST /api/orders/`. Prices are never taken from the client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreate {
    pub user_id: i64,
    #[validate(custom = "not_blank")]
    pub shipping_address: String,
    #[validate(
        length(min = 1, message = "This list may not be empty."),
        custom = "positive_quantities"
    )]
    pub items: Vec<OrderItemCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub book_id: i64,
    pub quantity: i64,
}

fn positive_quantities(items: &[OrderItemCreate]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.quantity < 1) {
        return Err(rule("min_quantity", "Ensure quantity is greater than or equal to 1."));
    }
    Ok(())
}

/// Partial update (PATCH). `total_amount` and items are read-only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct OrderUpdate {
    pub user_id: Option<i64>,
    pub status: Option<OrderStatus>,
    #[validate(custom = "not_blank")]
    pub shipping_address: Option<String>,
}

/// Full update (PUT). An omitted status is left as it is.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderReplace {
    pub user_id: i64,
    #[validate(custom = "not_blank")]
    pub shipping_address: String,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl From<OrderReplace> for OrderUpdate {
    fn from(r: OrderReplace) -> Self {
        Self {
            user_id: Some(r.user_id),
            status: r.status,
            shipping_address: Some(r.shipping_address),
        }
    }
}

/// Body of `PATCH /api/orders/{id}/update_status/`.
///
/// Kept as raw text so an unknown value reads as "Invalid status" rather than a
/// deserialisation error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StatusChange {
    #[serde(default)]
    pub status: Option<String>,
}

impl Order {
    pub fn apply(&mut self, update: OrderUpdate) {
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(shipping_address) = update.shipping_address {
            self.shipping_address = shipping_address;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_framework::FieldErrors;

    #[test]
    fn test_status_parses_only_known_values() {
        assert_eq!("SHIPPED".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("LOST".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_create_ignores_client_price() {
        let order: OrderCreate = serde_json::from_str(
            r#"{"user_id": 1, "shipping_address": "x",
                "items": [{"book_id": 5, "quantity": 2, "price": "0.01"}]}"#,
        )
        .unwrap();
        assert_eq!(order.items.len(), 1);
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_create_requires_items_with_positive_quantity() {
        let empty = OrderCreate {
            user_id: 1,
            shipping_address: "x".into(),
            items: vec![],
        };
        let errors = FieldErrors::from(empty.validate().unwrap_err());
        assert_eq!(errors.get("items").unwrap(), ["This list may not be empty."]);

        let zero = OrderCreate {
            user_id: 1,
            shipping_address: "x".into(),
            items: vec![OrderItemCreate {
                book_id: 5,
                quantity: 0,
            }],
        };
        let errors = FieldErrors::from(zero.validate().unwrap_err());
        assert_eq!(
            errors.get("items").unwrap(),
            ["Ensure quantity is greater than or equal to 1."]
        );
    }
}
