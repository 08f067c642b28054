// Typed failures at the Etsy API boundary.
//
// Callers need to tell "this shop doesn't exist" apart from "your key is
// wrong" or "you're offline", so fetch errors are an enum rather than an
// opaque anyhow chain.

use std::fmt;
use std::time::Duration;

/// A failure while fetching a shop's listings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No shop with this name or id exists (HTTP 404, or no exact name match).
    #[error("shop not found: {shop}")]
    ShopNotFound { shop: String },

    /// The API key was missing, invalid, or not allowed to read this shop.
    #[error("authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// Etsy returned 429 Too Many Requests.
    #[error("rate limited by the Etsy API")]
    RateLimited { retry_after: Option<Duration> },

    /// Connection failure, timeout, or a 5xx from the server.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response could not be decoded, or had an unexpected status.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
}

/// The category of a [`FetchError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    ShopNotFound,
    Auth,
    RateLimited,
    Network,
    MalformedResponse,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::ShopNotFound { .. } => FetchErrorKind::ShopNotFound,
            Self::Auth { .. } => FetchErrorKind::Auth,
            Self::RateLimited { .. } => FetchErrorKind::RateLimited,
            Self::Network { .. } => FetchErrorKind::Network,
            Self::MalformedResponse { .. } => FetchErrorKind::MalformedResponse,
        }
    }

    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network { .. })
    }

    /// Server-requested delay before retrying, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub(crate) fn network(err: impl fmt::Display) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(err: impl fmt::Display) -> Self {
        Self::MalformedResponse {
            message: err.to_string(),
        }
    }
}

impl FetchErrorKind {
    /// What the user can do about it.
    pub fn hint(self) -> &'static str {
        match self {
            Self::ShopNotFound => "Check the spelling of the shop name as it appears in the shop URL.",
            Self::Auth => "Check that ETSY_API_KEY is set to a valid key.",
            Self::RateLimited => "Etsy is throttling requests. Wait a moment and try again.",
            Self::Network => "Check your internet connection and try again.",
            Self::MalformedResponse => "Etsy returned something unexpected. Try again later.",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ShopNotFound => "shop not found",
            Self::Auth => "authentication failure",
            Self::RateLimited => "rate limited",
            Self::Network => "network error",
            Self::MalformedResponse => "malformed response",
        };
        f.write_str(label)
    }
}
