//! Axum plumbing shared by every feature slice.

mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiErrorExt};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
