//! Notification DSN parsing
//!
//! A DSN has the shape `scheme://[user[:password]@]host[:port][/path][?query]`.
//! The host may be a placeholder (`default`) that a bridge maps to its
//! vendor endpoint. Credentials never appear in the `Display` form.

use crate::error::{NotifierError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Parsed notification DSN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsn {
    scheme: String,
    host: String,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    path: Option<String>,
    options: BTreeMap<String, String>,
}

impl Dsn {
    /// Parse a single DSN string
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(NotifierError::malformed("the DSN is empty"));
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(NotifierError::malformed(
                "a DSN must not contain whitespace (combine DSNs with \" || \" or \" && \")",
            ));
        }
        match raw.split_once("://") {
            Some((scheme, _)) if !scheme.is_empty() => {}
            _ => {
                return Err(NotifierError::malformed(
                    "the DSN must contain a scheme followed by \"://\"",
                ))
            }
        }

        // Url errors never echo the input, so credentials stay out of the message
        let url = Url::parse(raw).map_err(|e| NotifierError::malformed(e.to_string()))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| NotifierError::malformed("the DSN must contain a host"))?
            .to_string();

        let user = match url.username() {
            "" => None,
            encoded => Some(decode_component(encoded, "user")?),
        };
        let password = url
            .password()
            .map(|encoded| decode_component(encoded, "password"))
            .transpose()?;

        let path = match url.path() {
            "" => None,
            p => Some(p.to_string()),
        };

        // Duplicate keys: the last occurrence wins
        let options = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
            user,
            password,
            path,
            options,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Option that the transport cannot work without
    pub fn required_option(&self, key: &str) -> Result<&str> {
        self.option(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| self.incomplete(key))
    }

    /// User part, for bridges that carry their token there
    pub fn required_user(&self) -> Result<&str> {
        self.user().ok_or_else(|| self.incomplete("user"))
    }

    /// Build the `IncompleteDsn` error for a missing option
    pub fn incomplete(&self, option: &str) -> NotifierError {
        NotifierError::IncompleteDsn {
            option: option.to_string(),
            dsn: self.to_string(),
        }
    }

    /// True when the host is the `default` placeholder
    pub fn has_default_host(&self) -> bool {
        self.host == "default"
    }
}

fn decode_component(encoded: &str, what: &str) -> Result<String> {
    urlencoding::decode(encoded)
        .map(|s| s.into_owned())
        .map_err(|_| NotifierError::malformed(format!("the {} is not valid UTF-8", what)))
}

/// Redacted form: `scheme://host[:port][/path][?options]`, options in key order
impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        if let Some(path) = &self.path {
            write!(f, "{}", path)?;
        }
        if !self.options.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.options.iter())
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

impl FromStr for Dsn {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self> {
        Dsn::parse(s)
    }
}
