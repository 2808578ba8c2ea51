//! Rendered content which carries its own content type.
//!
//! A [`Content`] value answers both halves of content negotiation itself: its
//! body is written as text and its content type comes from the value, so such
//! values can be returned from [`Status::apply`](crate::results::Status::apply)
//! but not streamed.

use mime::Mime;
use std::fmt;

use crate::content_type::text_xml_utf_8;

/// A rendered body together with its content type.
pub trait Content {
    fn body(&self) -> String;

    fn content_type(&self) -> Mime;
}

macro_rules! rendered_content {
    ($(#[$doc:meta])* $name:ident => $content_type:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            text: String,
        }

        impl $name {
            pub fn new<S: Into<String>>(text: S) -> Self {
                Self { text: text.into() }
            }

            pub fn as_str(&self) -> &str {
                &self.text
            }
        }

        impl Content for $name {
            fn body(&self) -> String {
                self.text.clone()
            }

            fn content_type(&self) -> Mime {
                $content_type
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.text)
            }
        }
    };
}

rendered_content!(
    /// Rendered html, served as `text/html; charset=utf-8`.
    Html => mime::TEXT_HTML_UTF_8
);

rendered_content!(
    /// Rendered plain text, served as `text/plain; charset=utf-8`.
    Txt => mime::TEXT_PLAIN_UTF_8
);

rendered_content!(
    /// Rendered xml, served as `text/xml; charset=utf-8`.
    Xml => text_xml_utf_8()
);
