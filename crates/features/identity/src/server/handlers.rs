#![allow(clippy::unused_async)]

use crate::server::extract::CurrentUser;
use crate::{Identity, LoginOutcome};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use caphub_kernel::domain::api::{LoginRequest, LoginResponse, MessageResponse, SessionResponse};
use caphub_kernel::server::{ApiError, ApiState};
use std::sync::Arc;
use zeroize::Zeroize;

pub(super) async fn login(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(LoginRequest { username, mut password }) = payload?;
    let identity = state.slice::<Identity>()?.clone();

    // PBKDF2 runs on the blocking pool.
    let worker = identity.clone();
    let LoginOutcome { user, token } = tokio::task::spawn_blocking(move || {
        let outcome = worker.login(&username, &password);
        password.zeroize();
        outcome
    })
    .await
    .map_err(|e| ApiError::from(format!("Login task failed: {e}")))??;

    let cookie = header_value(&identity.cookie().session(&token))?;
    let greeting = user.name.as_deref().unwrap_or(&user.username);
    let message = format!("Login successful. Welcome, {greeting}");

    Ok(([(SET_COOKIE, cookie)], Json(LoginResponse { message, user, token })))
}

pub(super) async fn logout(
    State(state): State<ApiState>,
    current: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let identity = state.slice::<Identity>()?;
    identity.logout(current.token.as_deref());

    let cookie = header_value(&identity.cookie().expired())?;
    Ok(([(SET_COOKIE, cookie)], Json(MessageResponse { message: "Logged out".to_owned() })))
}

pub(super) async fn me(current: CurrentUser) -> Json<SessionResponse> {
    let user = current.user.map(Arc::unwrap_or_clone);
    Json(SessionResponse { authenticated: user.is_some(), user })
}

fn header_value(cookie: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(cookie).map_err(|_| ApiError::from("Session cookie is not a valid header"))
}
