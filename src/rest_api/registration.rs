//! # Registration
//!
//! Sign-up form backed by the `registrations` collection. Passwords are
//! stored as given; hashing belongs to the auth layer in front of this service.

use bson::doc;
use serde::{Deserialize, Serialize};

use crate::observability::{Event, Logger};
use crate::store::{Filter, StoreAdapter};

use super::errors::{ApiError, ApiResult};
use super::response::MessageResponse;

/// Collection holding registered accounts
pub const REGISTRATIONS: &str = "registrations";

/// Registration form as posted by the frontend
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub retype_password: String,
    pub agree_terms: bool,
}

/// Public view of a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredUser {
    pub full_name: String,
    pub email: String,
}

/// Handles `/register` and `/registrations`
#[derive(Clone)]
pub struct Registrations {
    store: StoreAdapter,
}

impl Registrations {
    pub fn new(store: StoreAdapter) -> Self {
        Self { store }
    }

    pub async fn register(&self, form: RegistrationForm) -> ApiResult<MessageResponse> {
        if form.password != form.retype_password {
            return Err(ApiError::BadRequest("Passwords do not match".into()));
        }
        if !form.agree_terms {
            return Err(ApiError::BadRequest("You must agree to the terms".into()));
        }

        let existing = self
            .store
            .find_one(REGISTRATIONS, &Filter::eq("email", form.email.as_str()))
            .await?;
        if existing.is_some() {
            return Err(ApiError::BadRequest("Email already registered".into()));
        }

        let id = self
            .store
            .insert(
                REGISTRATIONS,
                doc! {
                    "full_name": form.full_name,
                    "email": form.email,
                    "password": form.password,
                },
            )
            .await?;
        Logger::emit(
            Event::DocumentCreated,
            &[("_id", &id.to_transport()), ("collection", REGISTRATIONS)],
        );

        Ok(MessageResponse::new("Registration successful"))
    }

    /// Registered accounts without their passwords; not-found when there are none
    pub async fn list(&self) -> ApiResult<Vec<RegisteredUser>> {
        let users: Vec<RegisteredUser> = self
            .store
            .find_many(REGISTRATIONS)
            .await?
            .into_iter()
            .map(|doc| RegisteredUser {
                full_name: doc.get_str("full_name").unwrap_or_default().to_string(),
                email: doc.get_str("email").unwrap_or_default().to_string(),
            })
            .collect();

        if users.is_empty() {
            return Err(ApiError::NotFound {
                message: "No users found".into(),
                status: axum::http::StatusCode::NOT_FOUND,
            });
        }
        Ok(users)
    }
}
