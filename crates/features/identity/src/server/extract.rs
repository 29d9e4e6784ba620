use crate::Identity;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, request::Parts};
use caphub_kernel::domain::identity::UserProfile;
use caphub_kernel::server::{ApiError, ApiState};
use std::sync::Arc;

/// The caller's session, resolved from an `Authorization: Bearer` header or the session
/// cookie. Anonymous callers get `user: None`; rejecting them is up to the handler.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser {
    pub token: Option<String>,
    pub user: Option<Arc<UserProfile>>,
}

impl CurrentUser {
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.user.as_deref()
    }
}

impl FromRequestParts<ApiState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let identity = state.slice::<Identity>()?;
        let token = session_token(&parts.headers, &identity.cookie().name);
        let user = identity.current_user(token.as_deref());

        Ok(Self { token, user })
    }
}

/// Picks the session token out of the request headers. A bearer token wins over the cookie.
#[must_use]
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, cookie_name)).map(str::to_owned)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then_some(value)
        })
}
