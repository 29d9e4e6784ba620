//! HTTP surface of the capabilities slice.

mod handlers;

use crate::error::CapabilityError;
use axum::Router;
use axum::routing::{delete, get, post};
use caphub_kernel::server::{ApiError, ApiState};

/// Catalog and registration-request routes.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/capabilities", get(handlers::list))
        .route("/capabilities/{name}/register", post(handlers::register))
        .route("/capabilities/{name}/unregister", delete(handlers::unregister))
        .route("/registration-requests", get(handlers::pending))
        .route("/registration-requests/{name}/approve", post(handlers::approve))
        .route("/registration-requests/{name}/reject", post(handlers::reject))
}

impl From<CapabilityError> for ApiError {
    fn from(err: CapabilityError) -> Self {
        match err {
            CapabilityError::Forbidden { message, context } => Self::Forbidden { message, context },
            CapabilityError::NotFound { message, context } => Self::NotFound { message, context },
            CapabilityError::Validation { message, context } => Self::Validation { message, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
