use axum::Router;
use caphub::kernel::prelude::ApiState;
use tower_http::trace::TraceLayer;

#[allow(unreachable_pub)]
pub fn init(state: ApiState) -> Router {
    caphub::server::routes().layer(TraceLayer::new_for_http()).with_state(state)
}
