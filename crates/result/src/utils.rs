//! Helpers shared by the header building code.
//!
//! Header values coming from user strings are converted without failing: bytes
//! that `HeaderValue` refuses are percent-encoded first.

use http::HeaderValue;
use mime::Mime;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// A macro for early returns with an error if a condition is not met.
///
/// This is similar to the `assert!` macro, but returns an error instead of panicking.
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

// controls, space and everything outside of ascii (always escaped by `utf8_percent_encode`)
const HEADER_VALUE_ESCAPE: &AsciiSet = &CONTROLS.add(b' ');

/// Converts `value` into a `HeaderValue`, percent-encoding controls, spaces and
/// non-ascii bytes when the raw string holds anything but visible ASCII, spaces
/// and tabs.
pub(crate) fn header_value_lossy(value: &str) -> HeaderValue {
    if value.bytes().all(|byte| byte == b'\t' || (0x20..=0x7e).contains(&byte))
        && let Ok(header_value) = HeaderValue::from_str(value)
    {
        return header_value;
    }

    let encoded = utf8_percent_encode(value, HEADER_VALUE_ESCAPE).to_string();
    // only visible ascii is left after encoding
    HeaderValue::from_str(&encoded).unwrap_or_else(|_| HeaderValue::from_static(""))
}

pub(crate) fn mime_header_value(mime: &Mime) -> HeaderValue {
    header_value_lossy(mime.as_ref())
}
