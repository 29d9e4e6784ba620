#![allow(clippy::unused_async)]

use crate::Capabilities;
use crate::workflow::Registration;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use caphub_identity::server::CurrentUser;
use caphub_kernel::domain::api::{EmailQuery, MessageResponse, RegistrationResponse, RequestsResponse};
use caphub_kernel::domain::catalog::CapabilityCatalog;
use caphub_kernel::server::{ApiError, ApiState};

type EmailParam = Result<Query<EmailQuery>, QueryRejection>;

pub(super) async fn list(State(state): State<ApiState>) -> Result<Json<CapabilityCatalog>, ApiError> {
    Ok(Json(state.slice::<Capabilities>()?.list()))
}

pub(super) async fn register(
    State(state): State<ApiState>,
    current: CurrentUser,
    Path(name): Path<String>,
    query: EmailParam,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let email = email(query)?;
    let outcome = state.slice::<Capabilities>()?.register(&name, &email, current.profile())?;

    let message = outcome.message();
    Ok(match outcome {
        Registration::Registered { .. } => {
            (StatusCode::OK, Json(RegistrationResponse { message, request: None }))
        }
        Registration::Requested(request) => {
            (StatusCode::ACCEPTED, Json(RegistrationResponse { message, request: Some(request) }))
        }
    })
}

pub(super) async fn unregister(
    State(state): State<ApiState>,
    current: CurrentUser,
    Path(name): Path<String>,
    query: EmailParam,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = email(query)?;
    state.slice::<Capabilities>()?.unregister(&name, &email, current.profile())?;

    Ok(Json(MessageResponse { message: format!("Unregistered {} from {name}", email.trim()) }))
}

pub(super) async fn pending(
    State(state): State<ApiState>,
    current: CurrentUser,
) -> Result<Json<RequestsResponse>, ApiError> {
    let requests = state.slice::<Capabilities>()?.pending_requests(current.profile())?;
    Ok(Json(RequestsResponse { requests }))
}

pub(super) async fn approve(
    State(state): State<ApiState>,
    current: CurrentUser,
    Path(name): Path<String>,
    query: EmailParam,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = email(query)?;
    let request = state.slice::<Capabilities>()?.approve(&name, &email, current.profile())?;

    Ok(Json(MessageResponse {
        message: format!("Approved registration for {} on {name}", request.email),
    }))
}

pub(super) async fn reject(
    State(state): State<ApiState>,
    current: CurrentUser,
    Path(name): Path<String>,
    query: EmailParam,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = email(query)?;
    let request = state.slice::<Capabilities>()?.reject(&name, &email, current.profile())?;

    Ok(Json(MessageResponse {
        message: format!("Rejected registration request for {} on {name}", request.email),
    }))
}

// A missing `email` is reported by the workflow, after the caller's role is checked.
fn email(query: EmailParam) -> Result<String, ApiError> {
    let Query(EmailQuery { email }) = query?;
    Ok(email.unwrap_or_default())
}
