//! # Request Validation
//!
//! Payloads are checked in two passes: serde enforces shape (types, required keys)
//! and `validator` enforces business rules (ranges, matching passwords, ...).
//! Both produce a [`FieldErrors`] map so callers always see the same body.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Key used for errors that don't belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name → list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when no error was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Maps a serde_json failure onto the field it names, when it names one.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        let message = e.to_string();
        if let Some(field) = missing_field(&message) {
            return Self::single(field, "This field is required.");
        }
        Self::single(NON_FIELD_ERRORS, message)
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

// serde_json reports "missing field `name` at line 1 column 12"
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// Flattens `validator` output into field → messages. Errors from nested payloads
/// (e.g. one order line) are reported under the parent field; struct-level errors
/// become [`NON_FIELD_ERRORS`].
impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        collect(&mut fields, None, errors);
        fields
    }
}

fn collect(fields: &mut FieldErrors, parent: Option<&str>, errors: ValidationErrors) {
    for (field, kind) in errors.into_errors() {
        let key = match (parent, field) {
            (Some(parent), _) => parent.to_string(),
            (None, "__all__") => NON_FIELD_ERRORS.to_string(),
            (None, field) => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    fields.add(key.clone(), message(&error));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(fields, Some(&key), *inner),
            ValidationErrorsKind::List(items) => {
                for inner in items.into_values() {
                    collect(fields, Some(&key), *inner);
                }
            }
        }
    }
}

fn message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({}).", error.code),
    }
}

/// Required text: rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("blank", "This field may not be blank."));
    }
    Ok(())
}

/// A `validator` error carrying the message clients see.
pub fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Payload {
        user_id: i64,
        shipping_address: String,
    }

    #[test]
    fn test_missing_field_is_reported_by_name() {
        let err = serde_json::from_str::<Payload>(r#"{"user_id": 1}"#).unwrap_err();
        let errors = FieldErrors::from_json_error(&err);
        assert_eq!(
            errors.get("shipping_address"),
            Some(&["This field is required.".to_string()][..])
        );
    }

    #[test]
    fn test_type_mismatch_is_non_field_error() {
        let err = serde_json::from_str::<Payload>(r#"{"user_id": "x", "shipping_address": "a"}"#)
            .unwrap_err();
        let errors = FieldErrors::from_json_error(&err);
        assert!(errors.get(NON_FIELD_ERRORS).is_some());
    }

    #[test]
    fn test_into_result_and_serialization() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.add("password", "Password fields didn't match.");
        errors.add("password", "Ensure this field has at least 8 characters.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["password"].as_array().unwrap().len(), 2);
        assert!(errors.into_result().is_err());
    }

    #[derive(Debug, Validate)]
    struct Signup {
        #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
        password: String,
        #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
        rating: Option<i64>,
    }

    #[test]
    fn test_validator_errors_keep_field_and_message() {
        let signup = Signup {
            password: "short".into(),
            rating: Some(9),
        };
        let errors = FieldErrors::from(signup.validate().unwrap_err());
        assert_eq!(
            errors.get("password"),
            Some(&["Ensure this field has at least 8 characters.".to_string()][..])
        );
        assert_eq!(
            errors.get("rating"),
            Some(&["Rating must be between 1 and 5".to_string()][..])
        );

        let fine = Signup {
            password: "long enough".into(),
            rating: None,
        };
        assert!(fine.validate().is_ok());
    }
}
