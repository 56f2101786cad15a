use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Username + password pair for HTTP Basic authentication.
///
/// Both ServiceNow and SolarWinds use Basic auth. The secret values are
/// resolved by the caller at request time; this type only carries them.
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    username: String,
    password: SecretString,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Attach an `Authorization: Basic base64(user:pass)` header.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}

/// Insert a secret-bearing header, marked sensitive so it never shows up
/// in `Debug` output of the header map.
pub(crate) fn insert_sensitive(
    headers: &mut HeaderMap,
    name: &'static str,
    value: &SecretString,
) -> Result<(), Error> {
    let mut header = HeaderValue::from_str(value.expose_secret()).map_err(|e| {
        Error::Authentication {
            message: format!("invalid {name} header value: {e}"),
        }
    })?;
    header.set_sensitive(true);
    headers.insert(HeaderName::from_static(name), header);
    Ok(())
}
