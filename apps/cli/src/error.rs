use std::borrow::Cow;

/// A specialized [`ClientError`] enum of this crate.
#[caphub_derive::caphub_error]
pub enum ClientError {
    /// The server answered with a non-2xx status; `message` is its `detail`.
    #[error("{message}")]
    Api { status: u16, message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Refused before anything was sent.
    #[error("{message}")]
    Denied { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Network error{}: {source}", format_context(.context))]
    Network { source: reqwest::Error, context: Option<Cow<'static, str>> },
    #[error("Unexpected response{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
    #[error("Session file error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
    #[error("Configuration error{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Internal client error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ClientError {
    pub(crate) fn denied(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Denied { message: message.into(), context: None }
    }

    pub(crate) fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config { message: message.into(), context: None }
    }

    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
