//! Merging cookies into `Set-Cookie` header values.
//!
//! Every cookie is kept as its own `Set-Cookie` value. [`Cookies::merge`] keys
//! cookies by name: a newer cookie replaces an older one in place, cookies with
//! distinct names are kept in first-appearance order, and discarded cookies are
//! replaced by removal cookies instead of being dropped, since a missing
//! `Set-Cookie` would leave the client copy untouched.

use cookie::Cookie;
use http::HeaderValue;
use tracing::debug;

use crate::utils::header_value_lossy;

/// Instruction to make the client drop the cookie `name`.
///
/// Path, domain and secure flag must match the original cookie for the
/// browser to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardingCookie {
    name: String,
    path: String,
    domain: Option<String>,
    secure: bool,
}

impl DiscardingCookie {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), path: String::from("/"), domain: None, secure: false }
    }

    #[must_use]
    pub fn path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The removal cookie sent to the client: empty value, `Max-Age=0` and an
    /// `Expires` date in the past.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.name.clone(), "")).path(self.path.clone()).secure(self.secure).build();
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie.make_removal();
        cookie
    }
}

impl From<&str> for DiscardingCookie {
    fn from(name: &str) -> Self {
        DiscardingCookie::new(name)
    }
}

impl From<String> for DiscardingCookie {
    fn from(name: String) -> Self {
        DiscardingCookie::new(name)
    }
}

#[derive(Debug)]
pub struct Cookies;

impl Cookies {
    /// Parses `Set-Cookie` values, skipping the ones that are not valid cookies.
    pub fn decode<'a, I>(values: I) -> Vec<Cookie<'static>>
    where
        I: IntoIterator<Item = &'a HeaderValue>,
    {
        values
            .into_iter()
            .filter_map(|value| match value.to_str().map(|s| Cookie::parse_encoded(s.to_owned())) {
                Ok(Ok(cookie)) => Some(cookie),
                Ok(Err(e)) => {
                    debug!(cause = %e, "skip unparsable set-cookie value");
                    None
                }
                Err(e) => {
                    debug!(cause = %e, "skip non visible ascii set-cookie value");
                    None
                }
            })
            .collect()
    }

    /// Serializes each cookie into its own `Set-Cookie` value.
    pub fn encode<'a, I>(cookies: I) -> Vec<HeaderValue>
    where
        I: IntoIterator<Item = &'a Cookie<'static>>,
    {
        cookies.into_iter().map(encode_cookie).collect()
    }

    /// Merges `cookies` and the removal cookies of `discard` into the existing
    /// `Set-Cookie` values.
    ///
    /// Later cookies win over earlier ones with the same name, and a discard
    /// wins over a cookie set in the same call. Existing values that are not
    /// replaced are kept byte for byte, including the ones that do not parse.
    pub fn merge<'a, E, C, D>(existing: E, cookies: C, discard: D) -> Vec<HeaderValue>
    where
        E: IntoIterator<Item = &'a HeaderValue>,
        C: IntoIterator<Item = Cookie<'static>>,
        D: IntoIterator<Item = DiscardingCookie>,
    {
        let mut merged: Vec<(Option<String>, HeaderValue)> = existing.into_iter().map(|value| (cookie_name(value), value.clone())).collect();

        let incoming = cookies.into_iter().chain(discard.into_iter().map(|discarding| discarding.to_cookie()));
        for cookie in incoming {
            let value = encode_cookie(&cookie);
            match merged.iter_mut().find(|(name, _)| name.as_deref() == Some(cookie.name())) {
                Some((_, current)) => *current = value,
                None => merged.push((Some(cookie.name().to_owned()), value)),
            }
        }

        merged.into_iter().map(|(_, value)| value).collect()
    }
}

fn encode_cookie(cookie: &Cookie<'_>) -> HeaderValue {
    header_value_lossy(&cookie.encoded().to_string())
}

/// The name of the cookie in a `Set-Cookie` value, if it parses as one.
fn cookie_name(value: &HeaderValue) -> Option<String> {
    let raw = String::from_utf8_lossy(value.as_bytes());
    match Cookie::parse_encoded(raw.as_ref()) {
        Ok(cookie) => Some(cookie.name().to_owned()),
        Err(e) => {
            debug!(cause = %e, "keep unparsable set-cookie value as is");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn no_headers() -> &'static [HeaderValue] {
        &[]
    }

    const NO_COOKIES: [Cookie<'static>; 0] = [];
    const NO_DISCARD: [DiscardingCookie; 0] = [];

    fn names_and_values(values: &[HeaderValue]) -> Vec<(String, String)> {
        Cookies::decode(values).into_iter().map(|c| (c.name().to_owned(), c.value().to_owned())).collect()
    }

    #[test]
    fn test_merge_disjoint_keeps_both() {
        let first = Cookies::merge(no_headers(), [Cookie::new("a", "1")], NO_DISCARD);
        let second = Cookies::merge(&first, [Cookie::new("b", "2")], NO_DISCARD);

        assert_eq!(names_and_values(&second), vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
    }

    #[test]
    fn test_merge_same_name_keeps_newest_in_place() {
        let first = Cookies::merge(no_headers(), [Cookie::new("a", "1"), Cookie::new("b", "2")], NO_DISCARD);
        let second = Cookies::merge(&first, [Cookie::new("a", "3")], NO_DISCARD);

        assert_eq!(names_and_values(&second), vec![("a".into(), "3".into()), ("b".into(), "2".into())]);
    }

    #[test]
    fn test_discard_emits_removal_cookie() {
        let first = Cookies::merge(no_headers(), [Cookie::new("x", "1"), Cookie::new("y", "2")], NO_DISCARD);
        let second = Cookies::merge(&first, NO_COOKIES, [DiscardingCookie::from("x")]);

        let cookies = Cookies::decode(&second);
        assert_eq!(cookies.len(), 2);

        let x = cookies.iter().find(|c| c.name() == "x").unwrap();
        assert_eq!(x.value(), "");
        assert_eq!(x.max_age(), Some(Duration::ZERO));
        assert_eq!(x.path(), Some("/"));

        let y = cookies.iter().find(|c| c.name() == "y").unwrap();
        assert_eq!(y.value(), "2");
    }

    #[test]
    fn test_discard_wins_over_cookie_in_same_call() {
        let merged = Cookies::merge(no_headers(), [Cookie::new("x", "1")], [DiscardingCookie::new("x").path("/app")]);

        let cookies = Cookies::decode(&merged);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].max_age(), Some(Duration::ZERO));
        assert_eq!(cookies[0].path(), Some("/app"));
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let merged = Cookies::merge(no_headers(), [Cookie::new("greeting", "hello world;")], NO_DISCARD);

        assert_eq!(names_and_values(&merged), vec![("greeting".into(), "hello world;".into())]);
    }

    #[test]
    fn test_untouched_values_are_kept_verbatim() {
        let existing = [HeaderValue::from_static("token=a%b/c=; Path=/")];
        let merged = Cookies::merge(&existing, [Cookie::new("lang", "en")], NO_DISCARD);

        assert_eq!(merged, vec![HeaderValue::from_static("token=a%b/c=; Path=/"), HeaderValue::from_static("lang=en")]);
    }

    #[test]
    fn test_raw_value_is_replaced_by_name() {
        let existing = [HeaderValue::from_static("lang=fr; Path=/"), HeaderValue::from_static("theme=dark")];
        let merged = Cookies::merge(&existing, [Cookie::new("lang", "en")], NO_DISCARD);

        assert_eq!(merged, vec![HeaderValue::from_static("lang=en"), HeaderValue::from_static("theme=dark")]);
    }

    #[test]
    fn test_unparsable_values_survive_merge() {
        let non_ascii = HeaderValue::from_bytes(b"name=caf\xc3\xa9").unwrap();
        let existing = [non_ascii.clone(), HeaderValue::from_static("=novalue")];

        let merged = Cookies::merge(&existing, [Cookie::new("lang", "en")], NO_DISCARD);

        assert_eq!(merged, vec![non_ascii, HeaderValue::from_static("=novalue"), HeaderValue::from_static("lang=en")]);
    }

    #[test]
    fn test_unparsable_values_are_skipped() {
        let values = [HeaderValue::from_static("=novalue"), HeaderValue::from_static("ok=1")];
        assert_eq!(names_and_values(&values), vec![("ok".into(), "1".into())]);
    }
}
