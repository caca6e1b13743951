use super::non_null;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_framework::{rule, Money};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
}

/// Settlement state. Creation walks PENDING → PROCESSING → COMPLETED; only a
/// COMPLETED payment may become REFUNDED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/payments/`. `amount` must equal the order's total.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentCreate {
    pub order_id: i64,
    pub user_id: i64,
    #[serde(default)]
    #[validate(required(message = "This field may not be null."), custom = "whole_cents")]
    pub amount: Option<Money>,
    pub payment_method: PaymentMethod,
}

/// Partial update (PATCH). `transaction_id` and timestamps are read-only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaymentUpdate {
    pub order_id: Option<i64>,
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "non_null")]
    #[validate(custom = "whole_cents")]
    pub amount: Option<Money>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
}

/// Full update (PUT). An omitted status is left as it is.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentReplace {
    pub order_id: i64,
    pub user_id: i64,
    #[serde(default)]
    #[validate(required(message = "This field may not be null."), custom = "whole_cents")]
    pub amount: Option<Money>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
}

impl From<PaymentReplace> for PaymentUpdate {
    fn from(r: PaymentReplace) -> Self {
        Self {
            order_id: Some(r.order_id),
            user_id: Some(r.user_id),
            amount: r.amount,
            payment_method: Some(r.payment_method),
            status: r.status,
        }
    }
}

impl Payment {
    pub fn apply(&mut self, update: PaymentUpdate) {
        if let Some(order_id) = update.order_id {
            self.order_id = order_id;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

fn whole_cents(amount: &Money) -> Result<(), ValidationError> {
    if !amount.has_whole_cents() {
        return Err(rule("decimal_places", "Ensure that there are no more than 2 decimal places."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_framework::FieldErrors;

    #[test]
    fn test_payment_method_wire_names() {
        let create: PaymentCreate = serde_json::from_str(
            r#"{"order_id": 1, "user_id": 1, "amount": "19.98", "payment_method": "BANK_TRANSFER"}"#,
        )
        .unwrap();
        assert_eq!(create.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(create.amount.map(Money::to_f64), Some(19.98));
        assert_eq!(
            serde_json::to_value(PaymentMethod::Paypal).unwrap(),
            serde_json::json!("PAYPAL")
        );
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let result = serde_json::from_str::<PaymentCreate>(
            r#"{"order_id": 1, "user_id": 1, "amount": 5, "payment_method": "CASH"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_null_amount_is_a_field_error() {
        let create: PaymentCreate = serde_json::from_str(
            r#"{"order_id": 1, "user_id": 1, "amount": null, "payment_method": "PAYPAL"}"#,
        )
        .unwrap();
        let errors = FieldErrors::from(create.validate().unwrap_err());
        assert_eq!(errors.get("amount").unwrap(), ["This field may not be null."]);
    }

    #[test]
    fn test_amount_limited_to_cents() {
        let create: PaymentCreate = serde_json::from_str(
            r#"{"order_id": 1, "user_id": 1, "amount": "19.985", "payment_method": "PAYPAL"}"#,
        )
        .unwrap();
        let errors = FieldErrors::from(create.validate().unwrap_err());
        assert!(errors.get("amount").is_some());
    }
}
