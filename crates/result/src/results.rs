//! Status factories: the entry point for building results.
//!
//! ```
//! use micro_result::result::{ActionResult, PlainResult};
//! use micro_result::results::{NOT_FOUND, OK, redirect};
//!
//! let found = OK.apply("hello");
//! let missing = NOT_FOUND.apply(micro_result::content::Html::new("<h1>not found</h1>"));
//! let moved: ActionResult = redirect("/login").discarding_cookies(["token"]).into();
//! # drop((found, missing, moved));
//! ```

use cookie::Cookie;
use http::header::LOCATION;
use http::{HeaderName, HeaderValue};
use mime::Mime;
use tracing::debug;

use crate::call::Call;
use crate::content_type::{ContentTypeOf, FixedContentType};
use crate::cookies::DiscardingCookie;
use crate::enumerator::Enumerator;
use crate::header::ResponseHeader;
use crate::result::{ActionResult, ChunkedResult, PlainResult, SimpleResult};
use crate::session::{Flash, Session};
use crate::utils::header_value_lossy;
use crate::writeable::Writeable;

/// Binds a status code to the results built from it.
///
/// The code is not validated here; see [`ActionResult::into_response`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    code: u16,
}

impl Status {
    pub const fn new(code: u16) -> Self {
        Self { code }
    }

    #[inline]
    pub const fn code(self) -> u16 {
        self.code
    }

    /// A result whose body is `content`.
    ///
    /// `Content-Type` is set iff `content` resolves one.
    pub fn apply<C>(self, content: C) -> SimpleResult<C>
    where
        C: Writeable + ContentTypeOf + Send + 'static,
    {
        let content_type = content.content_type_of();
        debug!(status = self.code, content_type = ?content_type, "build simple result");

        let header = ResponseHeader::new(self.code).with_content_type(content_type.as_ref());
        SimpleResult::new(header, Enumerator::once(content))
    }

    /// A result streaming `chunks` as they are produced.
    ///
    /// The content type comes from the chunk type alone, so types whose content
    /// type depends on the value can not be streamed:
    ///
    /// ```compile_fail
    /// use micro_result::content::Html;
    /// use micro_result::enumerator::Enumerator;
    /// use micro_result::results::OK;
    ///
    /// let chunks = Enumerator::once(Html::new("<p>first</p>"));
    /// let _ = OK.stream(chunks);
    /// ```
    ///
    /// ```
    /// use micro_result::enumerator::Enumerator;
    /// use micro_result::results::OK;
    ///
    /// let chunks = Enumerator::from_values(vec![String::from("first"), String::from("second")]);
    /// let _ = OK.stream(chunks);
    /// ```
    pub fn stream<C>(self, chunks: Enumerator<C>) -> ChunkedResult<C>
    where
        C: Writeable + FixedContentType + Send + 'static,
    {
        let content_type = C::content_type();
        debug!(status = self.code, content_type = ?content_type, "build chunked result");

        let header = ResponseHeader::new(self.code).with_content_type(content_type.as_ref());
        ChunkedResult::new(header, chunks)
    }

    /// A result whose finite body is concatenated from `body`.
    pub fn feed<C>(self, body: Enumerator<C>) -> SimpleResult<C>
    where
        C: Writeable + FixedContentType + Send + 'static,
    {
        let content_type = C::content_type();
        debug!(status = self.code, content_type = ?content_type, "build fed simple result");

        let header = ResponseHeader::new(self.code).with_content_type(content_type.as_ref());
        SimpleResult::new(header, body)
    }

    /// A result with an empty body and no `Content-Type`.
    pub fn empty(self) -> SimpleResult<()> {
        SimpleResult::new(ResponseHeader::new(self.code), Enumerator::empty())
    }
}

// A bare status is an empty result, so the header builders work on it directly.
impl Status {
    #[must_use]
    pub fn with_headers<I>(self, pairs: I) -> SimpleResult<()>
    where
        I: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        self.empty().with_headers(pairs)
    }

    #[must_use]
    pub fn with_header(self, name: HeaderName, value: HeaderValue) -> SimpleResult<()> {
        self.empty().with_header(name, value)
    }

    #[must_use]
    pub fn as_type(self, content_type: &Mime) -> SimpleResult<()> {
        self.empty().as_type(content_type)
    }

    #[must_use]
    pub fn with_cookies<I>(self, cookies: I) -> SimpleResult<()>
    where
        I: IntoIterator<Item = Cookie<'static>>,
    {
        self.empty().with_cookies(cookies)
    }

    #[must_use]
    pub fn discarding_cookies<I, S>(self, names: I) -> SimpleResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.empty().discarding_cookies(names)
    }

    #[must_use]
    pub fn discarding<I>(self, cookies: I) -> SimpleResult<()>
    where
        I: IntoIterator<Item = DiscardingCookie>,
    {
        self.empty().discarding(cookies)
    }

    #[must_use]
    pub fn with_session(self, session: &Session) -> SimpleResult<()> {
        self.empty().with_session(session)
    }

    #[must_use]
    pub fn with_new_session(self) -> SimpleResult<()> {
        self.empty().with_new_session()
    }

    #[must_use]
    pub fn flashing(self, flash: &Flash) -> SimpleResult<()> {
        self.empty().flashing(flash)
    }
}

impl From<Status> for SimpleResult<()> {
    fn from(status: Status) -> Self {
        status.empty()
    }
}

impl From<Status> for ActionResult {
    fn from(status: Status) -> Self {
        status.empty().into()
    }
}

pub const OK: Status = Status::new(200);
pub const CREATED: Status = Status::new(201);
pub const ACCEPTED: Status = Status::new(202);
pub const NO_CONTENT: Status = Status::new(204);

pub const MOVED_PERMANENTLY: Status = Status::new(301);
pub const FOUND: Status = Status::new(302);
pub const SEE_OTHER: Status = Status::new(303);
pub const NOT_MODIFIED: Status = Status::new(304);
pub const TEMPORARY_REDIRECT: Status = Status::new(307);

pub const BAD_REQUEST: Status = Status::new(400);
pub const UNAUTHORIZED: Status = Status::new(401);
pub const FORBIDDEN: Status = Status::new(403);
pub const NOT_FOUND: Status = Status::new(404);
pub const METHOD_NOT_ALLOWED: Status = Status::new(405);
pub const NOT_ACCEPTABLE: Status = Status::new(406);
pub const CONFLICT: Status = Status::new(409);
pub const GONE: Status = Status::new(410);
pub const PRECONDITION_FAILED: Status = Status::new(412);
pub const UNSUPPORTED_MEDIA_TYPE: Status = Status::new(415);
pub const TOO_MANY_REQUESTS: Status = Status::new(429);

pub const INTERNAL_SERVER_ERROR: Status = Status::new(500);
pub const NOT_IMPLEMENTED: Status = Status::new(501);
pub const BAD_GATEWAY: Status = Status::new(502);
pub const SERVICE_UNAVAILABLE: Status = Status::new(503);
pub const GATEWAY_TIMEOUT: Status = Status::new(504);

/// `302 Found` to `url`, with an empty body.
pub fn redirect<S: AsRef<str>>(url: S) -> SimpleResult<()> {
    redirect_with_status(url, FOUND)
}

/// `302 Found` to the url of a reverse routed call.
pub fn redirect_to(call: &Call) -> SimpleResult<()> {
    redirect(call.url())
}

/// Redirects with another code, typically `301`, `303` or `307`.
///
/// Bytes of `url` that can not appear in a header value are percent-encoded.
pub fn redirect_with_status<S: AsRef<str>>(url: S, status: Status) -> SimpleResult<()> {
    let location = header_value_lossy(url.as_ref());
    debug!(status = status.code, location = ?location, "build redirect");
    status.empty().with_header(LOCATION, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Html;
    use crate::xml::Node;
    use bytes::Bytes;
    use futures::StreamExt;
    use http::Method;
    use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
    use http_body_util::BodyExt;

    async fn drain<A: Writeable + Send + 'static>(result: SimpleResult<A>) -> (ResponseHeader, Bytes) {
        let header = result.header().clone();
        let bytes = result.into_bytes().into_body().collect::<Vec<_>>().await.concat();
        (header, Bytes::from(bytes))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_ok_hello() {
        let result = OK.apply("hello");
        assert_eq!(result.status(), 200);
        assert_eq!(result.header().content_type().unwrap(), "text/plain; charset=utf-8");

        let elements: Vec<_> = result.into_body().collect().await;
        assert_eq!(elements, vec!["hello"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_bare_status_is_empty_unit() {
        let (bare_header, bare_body) = drain(SimpleResult::from(Status::new(200))).await;
        let (unit_header, unit_body) = drain(OK.apply(())).await;

        assert_eq!(bare_header, unit_header);
        assert_eq!(bare_body, unit_body);
        assert!(bare_body.is_empty());
        assert!(bare_header.content_type().is_none());
    }

    #[test]
    fn test_value_based_content_type() {
        let result = OK.apply(Html::new("<p>hi</p>"));
        assert_eq!(result.header().content_type().unwrap(), "text/html; charset=utf-8");

        let result = OK.apply(Node::from(Node::element("note").child("hi")));
        assert_eq!(result.header().content_type().unwrap(), "text/xml; charset=utf-8");

        let result = OK.apply(serde_json::json!({ "ok": true }));
        assert_eq!(result.header().content_type().unwrap(), "application/json");

        let result = OK.apply(Bytes::from_static(b"\x00\x01"));
        assert_eq!(result.header().content_type().unwrap(), "application/octet-stream");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_redirect() {
        let (header, body) = drain(redirect("/x")).await;

        assert_eq!(header.status(), 302);
        assert_eq!(header.get(&LOCATION).unwrap(), "/x");
        assert!(header.content_type().is_none());
        assert!(body.is_empty());
    }

    #[test]
    fn test_redirect_to_call() {
        let call = Call::new(Method::GET, "/users/42");
        let result = redirect_to(&call);

        assert_eq!(result.status(), 302);
        assert_eq!(result.header().get(&LOCATION).unwrap(), "/users/42");
    }

    #[test]
    fn test_redirect_with_status_escapes_url() {
        let result = redirect_with_status("/search?q=caf\u{e9}", SEE_OTHER);

        assert_eq!(result.status(), 303);
        assert_eq!(result.header().get(&LOCATION).unwrap(), "/search?q=caf%C3%A9");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_stream_computes_header_once() {
        let chunks = Enumerator::from_values(vec![String::from("a"), String::from("b"), String::from("c")]);
        let result = OK.stream(chunks);

        assert_eq!(result.header().headers().len(), 1);
        assert_eq!(result.header().content_type().unwrap(), "text/plain; charset=utf-8");

        let chunks: Vec<_> = result.into_chunks().collect().await;
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_feed_concatenates() {
        let result = CREATED.feed(Enumerator::from_values(vec![Bytes::from_static(b"ab"), Bytes::from_static(b"cd")]));
        assert_eq!(result.header().content_type().unwrap(), "application/octet-stream");

        let response = ActionResult::from(result).into_response().await.unwrap();
        assert_eq!(response.status(), http::StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_LENGTH], "4");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"abcd"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_status_into_action_result() {
        let response = ActionResult::from(NO_CONTENT).into_response().await.unwrap();

        assert_eq!(response.status(), http::StatusCode::NO_CONTENT);
        assert!(!response.headers().contains_key(CONTENT_TYPE));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_status_builds_headers_directly() {
        let result = OK.with_header(LOCATION, HeaderValue::from_static("/next"));
        assert_eq!(result.status(), 200);
        assert_eq!(result.header().get(&LOCATION).unwrap(), "/next");

        let result = NOT_FOUND.with_cookies([Cookie::new("lang", "en")]).as_type(&mime::TEXT_PLAIN);
        assert_eq!(result.status(), 404);
        assert_eq!(result.header().set_cookies().count(), 1);
        assert_eq!(result.header().content_type().unwrap(), "text/plain");

        let (header, body) = drain(FOUND.discarding_cookies(["token"])).await;
        assert_eq!(header.status(), 302);
        assert!(header.set_cookies().next().unwrap().to_str().unwrap().starts_with("token=;"));
        assert!(body.is_empty());
    }

    #[test]
    fn test_constants() {
        assert_eq!(OK.code(), 200);
        assert_eq!(NOT_MODIFIED.code(), 304);
        assert_eq!(NOT_IMPLEMENTED.code(), 501);
        assert_eq!(Status::new(599).apply("custom").status(), 599);
    }
}
