//! Facade crate for Capabilities Hub features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `caphub` with the `server` feature to get the HTTP routes.
//! - Call [`init`] to build every feature slice, then register them in the `ApiState`.

use caphub_domain::config::ApiConfig;
use caphub_domain::registry::InitializedSlice;
use std::borrow::Cow;

pub use caphub_domain as domain;
pub use caphub_kernel as kernel;

/// Feature registry for runtime introspection.
pub mod features {
    pub use caphub_capabilities as capabilities;
    pub use caphub_identity as identity;

    /// Feature slices compiled into this build.
    pub const ENABLED: &[&str] = &[
        "identity",
        "capabilities",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

#[cfg(feature = "server")]
pub mod server {
    use axum::Router;
    use caphub_kernel::server::ApiState;

    pub mod router {
        pub use caphub_kernel::server::router::system_router;
    }

    /// Every route of every feature slice, still waiting for its state.
    pub fn routes() -> Router<ApiState> {
        Router::new()
            .merge(router::system_router())
            .merge(caphub_identity::server::router())
            .merge(caphub_capabilities::server::router())
    }
}

#[caphub_derive::caphub_error]
pub enum InitError {
    #[error("Identity initialization failed{}: {source}", format_context(.context))]
    Identity { source: caphub_identity::IdentityError, context: Option<Cow<'static, str>> },
    #[error("Capabilities initialization failed{}: {source}", format_context(.context))]
    Capabilities {
        source: caphub_capabilities::CapabilityError,
        context: Option<Cow<'static, str>>,
    },
}

/// Initialize every feature slice.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(config: &ApiConfig) -> Result<Vec<InitializedSlice>, InitError> {
    let mut slices = Vec::new();

    // Identity
    slices.push(features::identity::init(config)?);

    // Capabilities
    slices.push(features::capabilities::init(config)?);

    Ok(slices)
}
