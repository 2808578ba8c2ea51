//! Session and flash data, and their cookie codecs.
//!
//! Both are string maps serialized as `application/x-www-form-urlencoded` into a
//! single cookie. The session cookie is signed with the key of the
//! [`CookieConfig`]; the flash cookie only lives for the next request and is not.

use cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::CookieConfig;
use crate::cookies::DiscardingCookie;

macro_rules! cookie_data {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            data: BTreeMap<String, String>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn get(&self, key: &str) -> Option<&str> {
                self.data.get(key).map(String::as_str)
            }

            pub fn is_empty(&self) -> bool {
                self.data.is_empty()
            }

            pub fn len(&self) -> usize {
                self.data.len()
            }

            /// Returns a copy with `key` set to `value`.
            #[must_use]
            pub fn with<K: Into<String>, V: Into<String>>(&self, key: K, value: V) -> Self {
                let mut data = self.data.clone();
                data.insert(key.into(), value.into());
                Self { data }
            }

            /// Returns a copy without `key`.
            #[must_use]
            pub fn without(&self, key: &str) -> Self {
                let mut data = self.data.clone();
                data.remove(key);
                Self { data }
            }

            pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
                self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
            }

            fn to_urlencoded(&self) -> String {
                // a map of strings always serializes
                serde_urlencoded::to_string(&self.data).unwrap_or_default()
            }

            fn from_urlencoded(value: &str) -> Option<Self> {
                match serde_urlencoded::from_str(value) {
                    Ok(data) => Some(Self { data }),
                    Err(e) => {
                        debug!(cause = %e, kind = stringify!($name), "failed to decode cookie data");
                        None
                    }
                }
            }
        }

        impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for $name {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                Self { data: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
            }
        }
    };
}

cookie_data!(
    /// Data kept across requests in a signed cookie.
    Session
);

cookie_data!(
    /// Data visible to the next request only.
    Flash
);

/// Encodes data of type `Data` into one cookie and back.
pub trait CookieBaker {
    type Data;

    fn cookie_name(&self) -> &str;

    fn encode_as_cookie(&self, data: &Self::Data) -> Cookie<'static>;

    /// Decodes the cookie, falling back to empty data when it is missing or invalid.
    fn decode_from_cookie(&self, cookie: Option<&Cookie<'_>>) -> Self::Data;

    fn discard(&self) -> DiscardingCookie;
}

#[derive(Debug, Clone, Copy)]
pub struct SessionCodec<'a> {
    config: &'a CookieConfig,
}

impl<'a> SessionCodec<'a> {
    pub fn new(config: &'a CookieConfig) -> Self {
        Self { config }
    }
}

impl SessionCodec<'static> {
    pub fn global() -> Self {
        Self::new(CookieConfig::global())
    }
}

impl CookieBaker for SessionCodec<'_> {
    type Data = Session;

    fn cookie_name(&self) -> &str {
        self.config.session_cookie_name()
    }

    fn encode_as_cookie(&self, session: &Session) -> Cookie<'static> {
        let name = self.config.session_cookie_name().to_owned();
        let mut cookie = Cookie::build((name.clone(), session.to_urlencoded()))
            .path(self.config.path().to_owned())
            .secure(self.config.secure())
            .http_only(self.config.http_only())
            .build();
        if let Some(domain) = self.config.domain() {
            cookie.set_domain(domain.to_owned());
        }
        if let Some(max_age) = self.config.session_max_age() {
            cookie.set_max_age(time::Duration::try_from(max_age).unwrap_or(time::Duration::MAX));
        }

        let mut jar = CookieJar::new();
        jar.signed_mut(self.config.key()).add(cookie);
        // the jar holds the signed copy of the cookie it was just given
        jar.get(&name).cloned().unwrap_or_else(|| Cookie::new(name, ""))
    }

    fn decode_from_cookie(&self, cookie: Option<&Cookie<'_>>) -> Session {
        let Some(cookie) = cookie else {
            return Session::new();
        };

        let mut jar = CookieJar::new();
        jar.add_original(cookie.clone().into_owned());

        match jar.signed(self.config.key()).get(cookie.name()) {
            Some(verified) => Session::from_urlencoded(verified.value()).unwrap_or_default(),
            None => {
                debug!(name = cookie.name(), "session cookie signature mismatch, ignore it");
                Session::new()
            }
        }
    }

    fn discard(&self) -> DiscardingCookie {
        let discarding = DiscardingCookie::new(self.config.session_cookie_name()).path(self.config.path()).secure(self.config.secure());
        match self.config.domain() {
            Some(domain) => discarding.domain(domain),
            None => discarding,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlashCodec<'a> {
    config: &'a CookieConfig,
}

impl<'a> FlashCodec<'a> {
    pub fn new(config: &'a CookieConfig) -> Self {
        Self { config }
    }
}

impl FlashCodec<'static> {
    pub fn global() -> Self {
        Self::new(CookieConfig::global())
    }
}

impl CookieBaker for FlashCodec<'_> {
    type Data = Flash;

    fn cookie_name(&self) -> &str {
        self.config.flash_cookie_name()
    }

    fn encode_as_cookie(&self, flash: &Flash) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.config.flash_cookie_name().to_owned(), flash.to_urlencoded()))
            .path(self.config.path().to_owned())
            .secure(self.config.secure())
            .http_only(self.config.http_only())
            .build();
        if let Some(domain) = self.config.domain() {
            cookie.set_domain(domain.to_owned());
        }
        cookie
    }

    fn decode_from_cookie(&self, cookie: Option<&Cookie<'_>>) -> Flash {
        cookie.and_then(|cookie| Flash::from_urlencoded(cookie.value())).unwrap_or_default()
    }

    fn discard(&self) -> DiscardingCookie {
        let discarding = DiscardingCookie::new(self.config.flash_cookie_name()).path(self.config.path()).secure(self.config.secure());
        match self.config.domain() {
            Some(domain) => discarding.domain(domain),
            None => discarding,
        }
    }
}
