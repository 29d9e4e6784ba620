//! # Capabilities Hub CLI
//!
//! A terminal client for the Capabilities Hub server: it signs in, shows the capability
//! catalog, and submits registrations and request reviews.
//!
//! * [`client::ApiClient`] speaks the JSON API, sending the session token as a bearer token.
//! * [`session::SessionFile`] keeps that token between invocations.
//! * [`render`] turns API responses into text.
//!
//! Every command that changes a roster re-fetches and re-renders the catalog afterwards.
//! Failures leave local state untouched and surface as a one-line banner
//! ([`render::banner`]).

pub mod app;
pub mod cli;
pub mod client;
pub mod error;
pub mod render;
pub mod session;

pub use crate::app::{App, execute_offline};
pub use crate::cli::{Cli, Command};
pub use crate::client::ApiClient;
pub use crate::error::{ClientError, ClientErrorExt};
pub use crate::session::{SavedSession, SessionFile};
