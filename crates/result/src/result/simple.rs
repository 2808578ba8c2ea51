use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http::header::CONTENT_LENGTH;
use http::{HeaderValue, Response, StatusCode};
use tracing::trace;

use crate::body::ResponseBody;
use crate::enumerator::Enumerator;
use crate::error::ResultError;
use crate::header::ResponseHeader;
use crate::result::{PlainResult, build_response};
use crate::writeable::Writeable;

/// A result with a finite body, drained into one payload.
#[derive(Debug)]
pub struct SimpleResult<A> {
    header: ResponseHeader,
    body: Enumerator<A>,
}

impl<A> SimpleResult<A> {
    pub fn new(header: ResponseHeader, body: Enumerator<A>) -> Self {
        Self { header, body }
    }

    pub fn into_parts(self) -> (ResponseHeader, Enumerator<A>) {
        (self.header, self.body)
    }

    pub fn into_body(self) -> Enumerator<A> {
        self.body
    }
}

impl<A> SimpleResult<A>
where
    A: Writeable + Send + 'static,
{
    /// Runs every body element through its writer.
    pub fn into_bytes(self) -> SimpleResult<Bytes> {
        SimpleResult { header: self.header, body: self.body.map(|element| element.write().into_bytes()) }
    }

    /// Drains the body and builds the response, setting `Content-Length` when absent.
    pub async fn into_response(self) -> Result<Response<ResponseBody>, ResultError> {
        let (status, headers) = self.header.into_parts();
        let status_code = StatusCode::from_u16(status).map_err(|_invalid| ResultError::invalid_status(status))?;

        let payload = self
            .body
            .fold(BytesMut::new(), |mut buf, element| async move {
                buf.extend_from_slice(&element.write().into_bytes());
                buf
            })
            .await
            .freeze();

        let len = payload.len();
        trace!(status, len, "drained simple result");

        let mut response = build_response(status_code, headers, ResponseBody::once(payload));
        if permits_content_length(status_code) && !response.headers().contains_key(CONTENT_LENGTH) {
            response.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(len));
        }
        Ok(response)
    }
}

// 1xx and 204 must not carry a length, on 304 it would describe the cached representation
fn permits_content_length(status: StatusCode) -> bool {
    !(status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED)
}

impl<A> PlainResult for SimpleResult<A> {
    #[inline]
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn map_header<F>(self, f: F) -> Self
    where
        F: FnOnce(ResponseHeader) -> ResponseHeader,
    {
        Self { header: f(self.header), body: self.body }
    }
}
