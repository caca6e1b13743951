//! Error types for the payments service.

use crate::clients::OrdersUnavailable;
use service_framework::{FieldErrors, Money, ServiceError};
use thiserror::Error;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The orders service answered anything but 200 for this order.
    #[error("Order {0} not found")]
    OrderNotFound(i64),

    /// The submitted amount differs from the order's `total_amount`.
    #[error("Payment amount does not match order total")]
    AmountMismatch { amount: Money, total_amount: Money },

    #[error("This field may not be null.")]
    MissingAmount,

    /// Refund attempted on a payment that is not COMPLETED.
    #[error("Only completed payments can be refunded")]
    NotRefundable,

    /// The payment being refunded does not exist.
    #[error("Payment {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    OrdersUnavailable(#[from] OrdersUnavailable),

    /// An underlying database error occurred.
    #[error("Payment database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<PaymentError> for ServiceError {
    fn from(e: PaymentError) -> Self {
        let message = e.to_string();
        match e {
            PaymentError::OrderNotFound(_) | PaymentError::NotFound(_) => {
                ServiceError::NotFound(message)
            }
            PaymentError::AmountMismatch { .. } => ServiceError::BadRequest(message),
            PaymentError::MissingAmount => FieldErrors::single("amount", message).into(),
            PaymentError::NotRefundable => ServiceError::InvalidStateTransition(message),
            PaymentError::OrdersUnavailable(_) => ServiceError::ServiceUnavailable(message),
            PaymentError::Database(e) => ServiceError::Database(e),
        }
    }
}
