//! HTTP surface of the identity slice.

mod extract;
mod handlers;

pub use extract::{CurrentUser, session_token};

use crate::error::IdentityError;
use axum::Router;
use axum::routing::{get, post};
use caphub_kernel::server::{ApiError, ApiState};

/// `/auth/login`, `/auth/logout` and `/auth/me`.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Auth { message, .. } => Self::unauthorized(message),
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
