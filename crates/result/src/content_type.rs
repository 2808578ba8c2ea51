//! Resolving the `Content-Type` header for a body type.
//!
//! There are two resolution policies:
//!
//! - [`FixedContentType`]: the content type is a property of the type. Required for
//!   streamed bodies, because there is no single value to ask.
//! - [`ContentTypeOf`]: the content type is computed from the value itself. Every
//!   [`FixedContentType`] type also gets a [`ContentTypeOf`] implementation, see
//!   [`fixed_content_type!`](crate::fixed_content_type).
//!
//! Both return `Option<Mime>`; `None` means no `Content-Type` header is emitted.

use bytes::Bytes;
use mime::Mime;

use crate::content::Content;
use crate::xml::Node;

/// Value based content type resolution.
pub trait ContentTypeOf {
    fn content_type_of(&self) -> Option<Mime>;
}

/// Type based content type resolution.
pub trait FixedContentType: ContentTypeOf {
    fn content_type() -> Option<Mime>;
}

/// Implements [`FixedContentType`] and the matching [`ContentTypeOf`] for a type.
///
/// ```
/// use micro_result::fixed_content_type;
/// use micro_result::writeable::{Writeable, Written};
///
/// struct Csv(String);
///
/// impl Writeable for Csv {
///     fn write(self) -> Written {
///         Written::Text(self.0)
///     }
/// }
///
/// fixed_content_type!(Csv => Some(micro_result::mime::TEXT_CSV_UTF_8));
/// ```
#[macro_export]
macro_rules! fixed_content_type {
    ($ty:ty => $content_type:expr) => {
        impl $crate::content_type::FixedContentType for $ty {
            #[inline]
            fn content_type() -> ::std::option::Option<$crate::mime::Mime> {
                $content_type
            }
        }

        impl $crate::content_type::ContentTypeOf for $ty {
            #[inline]
            fn content_type_of(&self) -> ::std::option::Option<$crate::mime::Mime> {
                <$ty as $crate::content_type::FixedContentType>::content_type()
            }
        }
    };
}

fixed_content_type!(String => Some(mime::TEXT_PLAIN_UTF_8));
fixed_content_type!(&'static str => Some(mime::TEXT_PLAIN_UTF_8));
fixed_content_type!(Bytes => Some(mime::APPLICATION_OCTET_STREAM));
fixed_content_type!(Vec<u8> => Some(mime::APPLICATION_OCTET_STREAM));
fixed_content_type!(() => None);
fixed_content_type!(Node => Some(text_xml_utf_8()));
fixed_content_type!(serde_json::Value => Some(mime::APPLICATION_JSON));

impl<C: Content> ContentTypeOf for C {
    fn content_type_of(&self) -> Option<Mime> {
        Some(self.content_type())
    }
}

pub(crate) fn text_xml_utf_8() -> Mime {
    // `mime` has no constant carrying the charset for xml
    "text/xml; charset=utf-8".parse().unwrap_or(mime::TEXT_XML)
}
