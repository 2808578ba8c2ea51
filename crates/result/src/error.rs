use std::error::Error;
use thiserror::Error;

/// Boxed error produced by a foreign future wrapped in an [`AsyncResult`](crate::result::AsyncResult).
pub type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ResultError {
    /// The status code was accepted when the result was built, but the transport
    /// can not express it as an `http::StatusCode`.
    #[error("invalid status code: {code}")]
    InvalidStatus { code: u16 },

    #[error("async result failed: {source}")]
    Async { source: BoxError },
}

impl ResultError {
    pub fn invalid_status(code: u16) -> Self {
        Self::InvalidStatus { code }
    }

    pub fn async_failed<E: Into<BoxError>>(source: E) -> Self {
        Self::Async { source: source.into() }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("secret too short, current: {current_size} bytes, at least {min_size} bytes required")]
    SecretTooShort { current_size: usize, min_size: usize },

    #[error("invalid cookie name: {name:?}")]
    InvalidCookieName { name: String },

    #[error("cookie config has already been installed")]
    AlreadyInstalled,
}

impl ConfigError {
    pub fn secret_too_short(current_size: usize, min_size: usize) -> Self {
        Self::SecretTooShort { current_size, min_size }
    }

    pub fn invalid_cookie_name<S: Into<String>>(name: S) -> Self {
        Self::InvalidCookieName { name: name.into() }
    }
}
