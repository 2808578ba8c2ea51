//! A reverse routed call: the method and url a router resolved for an action.

use http::Method;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    method: Method,
    url: String,
}

impl Call {
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        Self { method, url: url.into() }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Builds the absolute url of this call for `host`.
    pub fn absolute_url(&self, secure: bool, host: &str) -> String {
        let scheme = if secure { "https" } else { "http" };
        format!("{scheme}://{host}{}", self.url)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
