//! The result abstraction: what request handling hands to the transport.
//!
//! - [`SimpleResult`]: header plus a finite body, drained into one payload.
//! - [`ChunkedResult`]: header plus a streamed body.
//! - [`AsyncResult`]: a future resolving to another result.
//!
//! [`ActionResult`] closes over the three shapes. Only the two plain shapes
//! implement [`PlainResult`] and its header mutators; an async result has to be
//! resolved first, which the type system enforces.
//!
//! All mutators consume the result and return a new one. A result is drained
//! exactly once, by [`ActionResult::into_response`].

mod async_result;
mod chunked;
mod plain;
mod simple;

pub use async_result::AsyncResult;
pub use chunked::ChunkedResult;
pub use plain::PlainResult;
pub use simple::SimpleResult;

use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};

use crate::body::ResponseBody;
use crate::error::ResultError;
use crate::header::ResponseHeader;
use crate::writeable::Writeable;

#[derive(Debug)]
pub enum ActionResult {
    Simple(SimpleResult<Bytes>),
    Chunked(ChunkedResult<Bytes>),
    Async(AsyncResult),
}

impl ActionResult {
    /// Returns the header if it is already known.
    pub fn header(&self) -> Option<&ResponseHeader> {
        match self {
            ActionResult::Simple(simple) => Some(simple.header()),
            ActionResult::Chunked(chunked) => Some(chunked.header()),
            ActionResult::Async(_) => None,
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, ActionResult::Async(_))
    }

    /// Resolves nested async results until a plain one is reached.
    pub async fn resolve(self) -> Result<ActionResult, ResultError> {
        let mut result = self;
        while let ActionResult::Async(async_result) = result {
            result = async_result.resolve().await?;
        }
        Ok(result)
    }

    /// Resolves the result and hands it over to the transport.
    ///
    /// The header is complete before the first body chunk is polled.
    pub async fn into_response(self) -> Result<Response<ResponseBody>, ResultError> {
        let mut result = self;
        loop {
            result = match result {
                ActionResult::Simple(simple) => return simple.into_response().await,
                ActionResult::Chunked(chunked) => return chunked.into_response(),
                ActionResult::Async(async_result) => async_result.resolve().await?,
            };
        }
    }
}

impl<A> From<SimpleResult<A>> for ActionResult
where
    A: Writeable + Send + 'static,
{
    fn from(simple: SimpleResult<A>) -> Self {
        ActionResult::Simple(simple.into_bytes())
    }
}

impl<A> From<ChunkedResult<A>> for ActionResult
where
    A: Writeable + Send + 'static,
{
    fn from(chunked: ChunkedResult<A>) -> Self {
        ActionResult::Chunked(chunked.into_bytes())
    }
}

impl From<AsyncResult> for ActionResult {
    fn from(async_result: AsyncResult) -> Self {
        ActionResult::Async(async_result)
    }
}

pub(crate) fn build_response(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CookieConfig, DEFAULT_FLASH_COOKIE_NAME};
    use crate::cookies::Cookies;
    use crate::enumerator::Enumerator;
    use crate::results::{CREATED, NOT_FOUND, NOT_MODIFIED, NO_CONTENT, OK, Status};
    use crate::session::{CookieBaker, Flash, FlashCodec, Session, SessionCodec};
    use cookie::Cookie;
    use http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION, SET_COOKIE};
    use http::HeaderValue;
    use http_body_util::BodyExt;
    use std::io;

    async fn drain(result: ActionResult) -> (StatusCode, HeaderMap, Bytes) {
        let response = result.into_response().await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (parts.status, parts.headers, bytes)
    }

    fn cookies_of<R: PlainResult>(result: &R) -> Vec<Cookie<'static>> {
        Cookies::decode(result.header().set_cookies())
    }

    #[test]
    fn test_with_headers_overlays_in_order() {
        let result = OK.apply("hello").with_headers([
            (LOCATION, HeaderValue::from_static("/a")),
            (CONTENT_LENGTH, HeaderValue::from_static("5")),
            (LOCATION, HeaderValue::from_static("/b")),
        ]);

        let headers = result.header().headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[LOCATION], "/b");
        assert_eq!(headers[CONTENT_LENGTH], "5");
        assert_eq!(headers[CONTENT_TYPE], "text/plain; charset=utf-8");
    }

    #[test]
    fn test_as_type() {
        let result = OK.apply("hello").as_type(&mime::TEXT_HTML_UTF_8).with_header(LOCATION, HeaderValue::from_static("/x"));
        assert_eq!(result.header().content_type().unwrap(), "text/html; charset=utf-8");

        let result = result.as_type(&mime::APPLICATION_JSON);
        assert_eq!(result.header().headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(result.header().content_type().unwrap(), "application/json");
    }

    #[test]
    fn test_with_cookies() {
        let disjoint = OK.empty().with_cookies([Cookie::new("a", "1")]).with_cookies([Cookie::new("b", "2")]);
        let names: Vec<_> = cookies_of(&disjoint).iter().map(|c| (c.name().to_owned(), c.value().to_owned())).collect();
        assert_eq!(names, vec![("a".to_owned(), "1".to_owned()), ("b".to_owned(), "2".to_owned())]);

        let same = OK.empty().with_cookies([Cookie::new("a", "1")]).with_cookies([Cookie::new("a", "2")]);
        let cookies = cookies_of(&same);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value(), "2");
    }

    #[test]
    fn test_with_cookies_keeps_raw_set_cookie_values() {
        let non_ascii = HeaderValue::from_bytes(b"name=caf\xc3\xa9").unwrap();
        let result = OK
            .empty()
            .with_header(SET_COOKIE, HeaderValue::from_static("token=a%b/c=; Path=/"))
            .map_header(|header| {
                let mut values: Vec<_> = header.set_cookies().cloned().collect();
                values.push(non_ascii.clone());
                header.with_set_cookies(values)
            })
            .with_cookies([Cookie::new("lang", "en")]);

        let values: Vec<_> = result.header().set_cookies().cloned().collect();
        assert_eq!(values, vec![HeaderValue::from_static("token=a%b/c=; Path=/"), non_ascii, HeaderValue::from_static("lang=en")]);
    }

    #[test]
    fn test_discarding_cookies_keeps_removal_marker() {
        let result = OK.empty().with_cookies([Cookie::new("x", "1")]).discarding_cookies(["x"]);

        let cookies = cookies_of(&result);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name(), "x");
        assert_eq!(cookies[0].value(), "");
        assert_eq!(cookies[0].max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn test_empty_session_discards_session_cookie() {
        let name = CookieConfig::global().session_cookie_name();

        let with_session = OK.empty().with_session(&Session::new());
        let discarding = OK.empty().discarding_cookies([name]);
        let new_session = OK.empty().with_new_session();

        let names = |cookies: Vec<Cookie<'static>>| cookies.iter().map(|c| (c.name().to_owned(), c.value().to_owned(), c.max_age())).collect::<Vec<_>>();
        assert_eq!(names(cookies_of(&with_session)), names(cookies_of(&discarding)));
        assert_eq!(names(cookies_of(&new_session)), names(cookies_of(&discarding)));
    }

    #[test]
    fn test_session_cookie_is_decodable() {
        let result = OK.empty().with_session_values([("user", "micro")]);

        let codec = SessionCodec::global();
        let cookies = cookies_of(&result);
        let cookie = cookies.iter().find(|c| c.name() == codec.cookie_name());

        assert_eq!(codec.decode_from_cookie(cookie).get("user"), Some("micro"));
    }

    #[test]
    fn test_flashing_keeps_other_cookies() {
        let result = OK.empty().with_cookies([Cookie::new("lang", "en")]).flashing(&Flash::new().with("success", "saved"));

        let cookies = cookies_of(&result);
        assert_eq!(cookies.len(), 2);

        let flash = cookies.iter().find(|c| c.name() == DEFAULT_FLASH_COOKIE_NAME);
        assert_eq!(FlashCodec::global().decode_from_cookie(flash).get("success"), Some("saved"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_async_is_transparent() {
        let direct = drain(CREATED.apply("payload").with_header(LOCATION, HeaderValue::from_static("/1")).into()).await;

        let deferred = AsyncResult::new(async { CREATED.apply("payload").with_header(LOCATION, HeaderValue::from_static("/1")) });
        let nested = AsyncResult::new(async move { deferred });
        let via_async = drain(nested.into()).await;

        assert_eq!(direct, via_async);
        assert_eq!(direct.2, Bytes::from_static(b"payload"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_async_map_runs_after_resolution() {
        let result = AsyncResult::new(async { NOT_FOUND.apply("missing") }).map(|resolved| match resolved {
            ActionResult::Simple(simple) => simple.as_type(&mime::TEXT_HTML_UTF_8).into(),
            other => other,
        });

        let (status, headers, body) = drain(result.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(headers[CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body, Bytes::from_static(b"missing"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_async_failure_is_propagated() {
        let result: ActionResult = AsyncResult::try_new(async { Err::<SimpleResult<()>, _>(io::Error::other("database down")) }).into();

        let err = result.into_response().await.unwrap_err();
        assert!(matches!(err, ResultError::Async { .. }));
        assert_eq!(err.to_string(), "async result failed: database down");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_invalid_status_rejected_by_transport() {
        let result: ActionResult = Status::new(42).apply("odd").into();
        assert_eq!(result.header().unwrap().status(), 42);

        let err = result.into_response().await.unwrap_err();
        assert!(matches!(err, ResultError::InvalidStatus { code: 42 }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_simple_sets_content_length() {
        let (_, headers, body) = drain(OK.feed(Enumerator::from_values(vec!["a", "bc"])).into()).await;

        assert_eq!(headers[CONTENT_LENGTH], "3");
        assert_eq!(body, Bytes::from_static(b"abc"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_bodiless_statuses_have_no_length() {
        for status in [NO_CONTENT, NOT_MODIFIED] {
            let (code, headers, body) = drain(status.into()).await;

            assert_eq!(code.as_u16(), status.code());
            assert!(!headers.contains_key(CONTENT_LENGTH));
            assert!(body.is_empty());
        }

        let (_, headers, _) = drain(OK.empty().into()).await;
        assert_eq!(headers[CONTENT_LENGTH], "0");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_chunked_streams_without_length() {
        let response = ActionResult::from(OK.stream(Enumerator::from_values(vec![String::from("a"), String::from("b")]))).into_response().await.unwrap();

        assert!(!response.headers().contains_key(CONTENT_LENGTH));
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"ab"));
    }
}
