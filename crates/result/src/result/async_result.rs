use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use tracing::error;

use crate::error::{BoxError, ResultError};
use crate::result::ActionResult;

/// A result whose header is not known yet.
///
/// The wrapped future is consumed by [`AsyncResult::resolve`], so its outcome is
/// delivered at most once. A failing future surfaces as [`ResultError::Async`].
pub struct AsyncResult {
    future: BoxFuture<'static, Result<ActionResult, ResultError>>,
}

impl AsyncResult {
    pub fn new<F, R>(future: F) -> Self
    where
        F: Future<Output = R> + Send + 'static,
        R: Into<ActionResult>,
    {
        Self { future: future.map(|result| Ok(result.into())).boxed() }
    }

    pub fn try_new<F, R, E>(future: F) -> Self
    where
        F: Future<Output = Result<R, E>> + Send + 'static,
        R: Into<ActionResult>,
        E: Into<BoxError>,
    {
        let future = future.map(|result| match result {
            Ok(result) => Ok(result.into()),
            Err(e) => {
                let e = e.into();
                error!(cause = %e, "async result failed");
                Err(ResultError::async_failed(e))
            }
        });
        Self { future: future.boxed() }
    }

    /// Waits for the wrapped future. The returned result may itself be async.
    pub async fn resolve(self) -> Result<ActionResult, ResultError> {
        self.future.await
    }

    /// Transforms the result once it is resolved.
    ///
    /// This is how header mutators reach an async result:
    ///
    /// ```
    /// use micro_result::result::{ActionResult, AsyncResult, PlainResult};
    /// use micro_result::results::OK;
    ///
    /// let result = AsyncResult::new(async { OK.apply("hello") }).map(|resolved| match resolved {
    ///     ActionResult::Simple(simple) => simple.as_type(&micro_result::mime::TEXT_HTML_UTF_8).into(),
    ///     other => other,
    /// });
    /// # drop(result);
    /// ```
    #[must_use]
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(ActionResult) -> ActionResult + Send + 'static,
    {
        Self { future: self.future.map(|result| result.map(f)).boxed() }
    }
}

impl fmt::Debug for AsyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AsyncResult")
    }
}
