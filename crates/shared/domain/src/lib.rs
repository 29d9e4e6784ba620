//! # Domain Models
//!
//! Pure data shared by the server, the feature slices and the terminal client:
//! capabilities, registration requests, user profiles, roles and the wire DTOs.
//! Keep it lean: `serde` and `bitflags` only, no I/O.

pub mod api;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod identity;
pub mod registry;
