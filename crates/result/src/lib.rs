//! Typed results for a web framework.
//!
//! A result is a [`ResponseHeader`] and a body. How a body value becomes bytes
//! ([`Writeable`]) and which `Content-Type` goes with it ([`ContentTypeOf`],
//! [`FixedContentType`]) is resolved by the compiler from the body's type:
//!
//! ```
//! use micro_result::result::{ActionResult, PlainResult};
//! use micro_result::results::OK;
//!
//! # async fn handle() -> Result<(), micro_result::error::ResultError> {
//! let result = OK.apply("hello").with_session_values([("user", "micro")]);
//! assert_eq!(result.header().content_type().unwrap(), "text/plain; charset=utf-8");
//!
//! let response = ActionResult::from(result).into_response().await?;
//! assert_eq!(response.status(), 200);
//! # Ok(())
//! # }
//! ```
//!
//! Results are immutable: every `with_*` mutator consumes the result and returns
//! a new one. [`ActionResult::into_response`] hands a result to the transport as an
//! `http::Response` whose body implements `http_body::Body`.

mod utils;

pub mod body;
pub mod call;
pub mod config;
pub mod content;
pub mod content_type;
pub mod cookies;
pub mod enumerator;
pub mod error;
pub mod event_source;
pub mod header;
pub mod result;
pub mod results;
pub mod session;
pub mod writeable;
pub mod xml;

pub use body::ResponseBody;
pub use call::Call;
pub use config::CookieConfig;
pub use content_type::{ContentTypeOf, FixedContentType};
pub use enumerator::Enumerator;
pub use header::ResponseHeader;
pub use result::{ActionResult, AsyncResult, ChunkedResult, PlainResult, SimpleResult};
pub use results::Status;
pub use writeable::{Writeable, Written};

pub use cookie::Cookie;
pub use mime;
