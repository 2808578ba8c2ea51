//! The status line and header map of a result.
//!
//! [`ResponseHeader`] is an immutable value: every operation consumes it and returns
//! a new header, so results built from it can be shared freely between tasks.

use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use mime::Mime;

use crate::utils::mime_header_value;

/// An immutable `(status, headers)` pair.
///
/// The status is kept as a raw `u16` and is not validated here; the transport
/// decides what to do with codes `http::StatusCode` can't represent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    status: u16,
    headers: HeaderMap,
}

impl ResponseHeader {
    /// Creates a header with the given status and no header entries.
    pub fn new(status: u16) -> Self {
        Self { status, headers: HeaderMap::new() }
    }

    pub fn with_header_map(status: u16, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the status as an `http::StatusCode`, if the code is representable.
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the first value of the header `name`.
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.headers.get(CONTENT_TYPE)
    }

    /// Returns every `Set-Cookie` value in insertion order.
    pub fn set_cookies(&self) -> impl Iterator<Item = &HeaderValue> {
        self.headers.get_all(SET_COOKIE).iter()
    }

    /// Overlays `pairs` on the current headers in order, the last value for a
    /// repeated name wins.
    #[must_use]
    pub fn with_headers<I>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        let Self { status, mut headers } = self;
        for (name, value) in pairs {
            headers.insert(name, value);
        }
        Self { status, headers }
    }

    #[must_use]
    pub fn with_content_type(self, content_type: Option<&Mime>) -> Self {
        match content_type {
            Some(mime) => self.with_headers([(CONTENT_TYPE, mime_header_value(mime))]),
            None => self,
        }
    }

    /// Replaces all `Set-Cookie` values with `values`, one header value per cookie.
    #[must_use]
    pub fn with_set_cookies<I>(self, values: I) -> Self
    where
        I: IntoIterator<Item = HeaderValue>,
    {
        let Self { status, mut headers } = self;
        headers.remove(SET_COOKIE);
        for value in values {
            headers.append(SET_COOKIE, value);
        }
        Self { status, headers }
    }

    pub fn into_parts(self) -> (u16, HeaderMap) {
        (self.status, self.headers)
    }
}
