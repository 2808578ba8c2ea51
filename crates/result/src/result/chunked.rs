use bytes::Bytes;
use http::Response;
use tracing::trace;

use crate::body::ResponseBody;
use crate::enumerator::Enumerator;
use crate::error::ResultError;
use crate::header::ResponseHeader;
use crate::result::{PlainResult, build_response};
use crate::writeable::Writeable;

/// A result streaming its body chunk by chunk, possibly without end.
#[derive(Debug)]
pub struct ChunkedResult<A> {
    header: ResponseHeader,
    chunks: Enumerator<A>,
}

impl<A> ChunkedResult<A> {
    pub fn new(header: ResponseHeader, chunks: Enumerator<A>) -> Self {
        Self { header, chunks }
    }

    pub fn into_parts(self) -> (ResponseHeader, Enumerator<A>) {
        (self.header, self.chunks)
    }

    pub fn into_chunks(self) -> Enumerator<A> {
        self.chunks
    }
}

impl<A> ChunkedResult<A>
where
    A: Writeable + Send + 'static,
{
    pub fn into_bytes(self) -> ChunkedResult<Bytes> {
        ChunkedResult { header: self.header, chunks: self.chunks.map(|chunk| chunk.write().into_bytes()) }
    }

    /// Builds the response; chunks are written lazily as the transport polls the body.
    pub fn into_response(self) -> Result<Response<ResponseBody>, ResultError> {
        let (status, headers) = self.header.into_parts();
        let status_code = http::StatusCode::from_u16(status).map_err(|_invalid| ResultError::invalid_status(status))?;

        trace!(status, "streaming chunked result");

        let body = ResponseBody::chunked(self.chunks.map(|chunk| chunk.write().into_bytes()));
        Ok(build_response(status_code, headers, body))
    }
}

impl<A> PlainResult for ChunkedResult<A> {
    #[inline]
    fn header(&self) -> &ResponseHeader {
        &self.header
    }

    fn map_header<F>(self, f: F) -> Self
    where
        F: FnOnce(ResponseHeader) -> ResponseHeader,
    {
        Self { header: f(self.header), chunks: self.chunks }
    }
}
