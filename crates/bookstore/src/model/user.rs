use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_framework::not_blank;
use std::fmt;
use validator::Validate;

/// A registered account.
///
/// The password digest is loaded with the row but never serialised.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub date_joined: DateTime<Utc>,
    #[serde(skip)]
    pub password_hash: String,
}

/// Payload for `POST /api/users/register/` and `POST /api/users/`.
#[derive(Clone, Deserialize, Validate)]
pub struct UserRegistration {
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Ensure this field has at least 8 characters."),
        must_match(other = "password2", message = "Password fields didn't match.")
    )]
    pub password: String,
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl fmt::Debug for UserRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish_non_exhaustive()
    }
}

/// Payload for `POST /api/users/login/`.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(custom = "not_blank")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Profile update (PATCH). The password is not writable here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(custom = "not_blank")]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Full profile replacement (PUT).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserReplace {
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl From<UserReplace> for UserUpdate {
    fn from(r: UserReplace) -> Self {
        Self {
            username: Some(r.username),
            email: Some(r.email),
            first_name: Some(r.first_name),
            last_name: Some(r.last_name),
            phone: Some(r.phone),
            address: Some(r.address),
        }
    }
}

impl User {
    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
    }
}
