use super::health;
use axum::Router;
use axum::routing::get;

/// Routes every deployment exposes regardless of enabled slices.
pub fn system_router<S>() -> Router<S>
where
    S: Send + Sync + Clone + 'static,
{
    Router::new().route("/health", get(health::health_handler))
}
