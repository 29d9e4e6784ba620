//! Kernel utilities shared across feature slices.
//! Keep this crate lightweight: configuration loading, random tokens and, with the
//! `server` feature, the Axum state registry and the HTTP error type.
//!
//! ## Tokens
//! Use `random_token!` for session tokens and salts:
//! ```rust
//! # use caphub_kernel::random_token;
//! let token = random_token!();
//! assert_eq!(token.len(), 32);
//! ```
pub mod config;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Default length of [`random_token!`] output (~185 bits of entropy).
pub const TOKEN_LENGTH: usize = 32;

pub use caphub_domain as domain;
pub use nanoid::nanoid;

/// Generates a random, URL and cookie safe token from [`SAFE_ALPHABET`].
#[macro_export]
macro_rules! random_token {
    () => {
        $crate::nanoid!(($crate::TOKEN_LENGTH), $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
