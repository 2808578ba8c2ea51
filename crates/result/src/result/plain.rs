use cookie::Cookie;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue};
use mime::Mime;
use std::iter;

use crate::config::CookieConfig;
use crate::cookies::{Cookies, DiscardingCookie};
use crate::header::ResponseHeader;
use crate::session::{CookieBaker, Flash, FlashCodec, Session, SessionCodec};
use crate::utils::mime_header_value;

/// A result whose header is already known.
///
/// Every mutator consumes the result and returns a new one with a new header; the
/// body is carried over untouched. [`AsyncResult`](crate::result::AsyncResult)
/// does not implement this trait, its header is only known once it resolved.
pub trait PlainResult: Sized {
    fn header(&self) -> &ResponseHeader;

    /// Replaces the header with `f(header)`, keeping the body.
    #[must_use]
    fn map_header<F>(self, f: F) -> Self
    where
        F: FnOnce(ResponseHeader) -> ResponseHeader;

    #[inline]
    fn status(&self) -> u16 {
        self.header().status()
    }

    /// Adds the given headers, overwriting existing values with the same name.
    #[must_use]
    fn with_headers<I>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        self.map_header(|header| header.with_headers(pairs))
    }

    #[must_use]
    fn with_header(self, name: HeaderName, value: HeaderValue) -> Self {
        self.with_headers([(name, value)])
    }

    /// Sets the `Content-Type` header, replacing any previous one.
    #[must_use]
    fn as_type(self, content_type: &Mime) -> Self {
        self.with_headers([(CONTENT_TYPE, mime_header_value(content_type))])
    }

    /// Adds cookies, replacing already set cookies with the same name.
    #[must_use]
    fn with_cookies<I>(self, cookies: I) -> Self
    where
        I: IntoIterator<Item = Cookie<'static>>,
    {
        self.map_header(|header| {
            let merged = Cookies::merge(header.set_cookies(), cookies, iter::empty());
            header.with_set_cookies(merged)
        })
    }

    /// Tells the client to drop the cookies with the given names, on path `/`.
    #[must_use]
    fn discarding_cookies<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.discarding(names.into_iter().map(DiscardingCookie::new))
    }

    /// Tells the client to drop the given cookies.
    #[must_use]
    fn discarding<I>(self, cookies: I) -> Self
    where
        I: IntoIterator<Item = DiscardingCookie>,
    {
        self.map_header(|header| {
            let merged = Cookies::merge(header.set_cookies(), iter::empty(), cookies);
            header.with_set_cookies(merged)
        })
    }

    /// Replaces the session with `session` using the process wide [`CookieConfig`].
    ///
    /// An empty session discards the session cookie.
    #[must_use]
    fn with_session(self, session: &Session) -> Self {
        self.with_session_using(CookieConfig::global(), session)
    }

    #[must_use]
    fn with_session_using(self, config: &CookieConfig, session: &Session) -> Self {
        let codec = SessionCodec::new(config);
        if session.is_empty() {
            self.discarding([codec.discard()])
        } else {
            self.with_cookies([codec.encode_as_cookie(session)])
        }
    }

    #[must_use]
    fn with_session_values<I, K, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_session(&values.into_iter().collect())
    }

    #[must_use]
    fn with_new_session(self) -> Self {
        self.with_session(&Session::new())
    }

    /// Sets the flash cookie using the process wide [`CookieConfig`].
    #[must_use]
    fn flashing(self, flash: &Flash) -> Self {
        self.flashing_using(CookieConfig::global(), flash)
    }

    #[must_use]
    fn flashing_using(self, config: &CookieConfig, flash: &Flash) -> Self {
        self.with_cookies([FlashCodec::new(config).encode_as_cookie(flash)])
    }

    #[must_use]
    fn flashing_values<I, K, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.flashing(&values.into_iter().collect())
    }
}
