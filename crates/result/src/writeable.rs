//! Converting body values into response payloads.
//!
//! The [`Writeable`] trait is the writer half of content negotiation: the compiler
//! picks the implementation for the static type of the body, so there is exactly
//! one way a value of a given type becomes bytes and a missing implementation is a
//! build error rather than a runtime failure.
//!
//! ```compile_fail
//! use micro_result::results::OK;
//!
//! struct NotWriteable;
//!
//! // no `Writeable` / `ContentTypeOf` implementation, so this does not build
//! let _ = OK.apply(NotWriteable);
//! ```

use bytes::Bytes;

use crate::content::Content;
use crate::xml::Node;

/// The payload produced by a [`Writeable`] value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Written {
    Text(String),
    Bytes(Bytes),
}

impl Written {
    pub fn into_bytes(self) -> Bytes {
        match self {
            Written::Text(text) => Bytes::from(text),
            Written::Bytes(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Written::Text(text) => text.is_empty(),
            Written::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

/// A type which knows how to turn its values into a response payload.
pub trait Writeable {
    fn write(self) -> Written;
}

impl Writeable for String {
    #[inline]
    fn write(self) -> Written {
        Written::Text(self)
    }
}

impl Writeable for &'static str {
    #[inline]
    fn write(self) -> Written {
        Written::Bytes(Bytes::from_static(self.as_bytes()))
    }
}

impl Writeable for Bytes {
    #[inline]
    fn write(self) -> Written {
        Written::Bytes(self)
    }
}

impl Writeable for Vec<u8> {
    #[inline]
    fn write(self) -> Written {
        Written::Bytes(Bytes::from(self))
    }
}

impl Writeable for () {
    #[inline]
    fn write(self) -> Written {
        Written::Text(String::new())
    }
}

impl Writeable for Node {
    fn write(self) -> Written {
        Written::Text(self.to_string())
    }
}

impl Writeable for serde_json::Value {
    fn write(self) -> Written {
        Written::Text(self.to_string())
    }
}

impl<C: Content> Writeable for C {
    fn write(self) -> Written {
        Written::Text(self.body())
    }
}
