//! Cookie settings shared by the session and flash codecs.
//!
//! A [`CookieConfig`] is built once with [`CookieConfig::builder`] and installed as
//! the process wide instance with [`CookieConfig::install`]. After installation it
//! is read-only, so concurrent requests read it without synchronization beyond the
//! one-time initialization of the cell.

use cookie::Key;
use once_cell::sync::OnceCell;
use std::fmt;
use std::time::Duration;
use tracing::warn;

use crate::error::ConfigError;
use crate::utils::ensure;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "MICRO_SESSION";
pub const DEFAULT_FLASH_COOKIE_NAME: &str = "MICRO_FLASH";

/// Minimal length of the secret the signing key is derived from.
pub const MIN_SECRET_LEN: usize = 32;

static COOKIE_CONFIG: OnceCell<CookieConfig> = OnceCell::new();

#[derive(Clone)]
pub struct CookieConfig {
    session_cookie_name: String,
    flash_cookie_name: String,
    key: Key,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    session_max_age: Option<Duration>,
}

impl CookieConfig {
    pub fn builder() -> CookieConfigBuilder {
        CookieConfigBuilder::new()
    }

    /// Installs `self` as the process wide configuration.
    ///
    /// Fails if a configuration is already installed, including the default one
    /// created by an earlier call to [`CookieConfig::global`].
    pub fn install(self) -> Result<(), ConfigError> {
        match COOKIE_CONFIG.set(self) {
            Ok(()) => Ok(()),
            Err(_rejected) => Err(ConfigError::AlreadyInstalled),
        }
    }

    /// Returns the installed configuration, installing the default one on first use.
    pub fn global() -> &'static CookieConfig {
        COOKIE_CONFIG.get_or_init(CookieConfig::default)
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    pub fn flash_cookie_name(&self) -> &str {
        &self.flash_cookie_name
    }

    pub(crate) fn key(&self) -> &Key {
        &self.key
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn http_only(&self) -> bool {
        self.http_only
    }

    pub fn session_max_age(&self) -> Option<Duration> {
        self.session_max_age
    }
}

impl Default for CookieConfig {
    /// Default names and flags with an ephemeral signing key.
    fn default() -> Self {
        warn!("no cookie secret configured, sessions are signed with an ephemeral key");
        Self {
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_owned(),
            flash_cookie_name: DEFAULT_FLASH_COOKIE_NAME.to_owned(),
            key: Key::generate(),
            path: String::from("/"),
            domain: None,
            secure: false,
            http_only: true,
            session_max_age: None,
        }
    }
}

impl fmt::Debug for CookieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("flash_cookie_name", &self.flash_cookie_name)
            .field("key", &"<redacted>")
            .field("path", &self.path)
            .field("domain", &self.domain)
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("session_max_age", &self.session_max_age)
            .finish()
    }
}

#[derive(Debug)]
pub struct CookieConfigBuilder {
    session_cookie_name: String,
    flash_cookie_name: String,
    secret: Option<Vec<u8>>,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    session_max_age: Option<Duration>,
}

impl CookieConfigBuilder {
    fn new() -> Self {
        Self {
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_owned(),
            flash_cookie_name: DEFAULT_FLASH_COOKIE_NAME.to_owned(),
            secret: None,
            path: String::from("/"),
            domain: None,
            secure: false,
            http_only: true,
            session_max_age: None,
        }
    }

    pub fn session_cookie_name<S: Into<String>>(mut self, name: S) -> Self {
        self.session_cookie_name = name.into();
        self
    }

    pub fn flash_cookie_name<S: Into<String>>(mut self, name: S) -> Self {
        self.flash_cookie_name = name.into();
        self
    }

    /// The secret the session signing key is derived from, at least [`MIN_SECRET_LEN`] bytes.
    pub fn secret<B: AsRef<[u8]>>(mut self, secret: B) -> Self {
        self.secret = Some(secret.as_ref().to_vec());
        self
    }

    pub fn path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = path.into();
        self
    }

    pub fn domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn session_max_age(mut self, max_age: Duration) -> Self {
        self.session_max_age = Some(max_age);
        self
    }

    pub fn build(self) -> Result<CookieConfig, ConfigError> {
        ensure!(is_cookie_name(&self.session_cookie_name), ConfigError::invalid_cookie_name(self.session_cookie_name));
        ensure!(is_cookie_name(&self.flash_cookie_name), ConfigError::invalid_cookie_name(self.flash_cookie_name));

        let key = match &self.secret {
            Some(secret) => {
                ensure!(secret.len() >= MIN_SECRET_LEN, ConfigError::secret_too_short(secret.len(), MIN_SECRET_LEN));
                Key::derive_from(secret)
            }
            None => {
                warn!("no cookie secret configured, sessions are signed with an ephemeral key");
                Key::generate()
            }
        };

        Ok(CookieConfig {
            session_cookie_name: self.session_cookie_name,
            flash_cookie_name: self.flash_cookie_name,
            key,
            path: self.path,
            domain: self.domain,
            secure: self.secure,
            http_only: self.http_only,
            session_max_age: self.session_max_age,
        })
    }
}

// cookie names are http tokens
fn is_cookie_name(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}
