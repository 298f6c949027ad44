//! User consent URL construction
//!
//! The consent URL is handed back to the caller to redirect a user's browser;
//! this crate never fetches it. eBay expects the scope list space-delimited
//! and percent-encoded (`%20`, not `+`), so query values are encoded here with
//! an RFC 3986 unreserved set instead of form encoding.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::RngExt;
use url::Url;

use crate::constants::AUTHORIZE_PATH;
use crate::error::{Error, Result};
use crate::options::OAuthOptions;

/// Everything except RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Join key/value pairs into a percent-encoded query string.
pub(crate) fn encode_query(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_VALUE),
                utf8_percent_encode(value, QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the URL a user visits to grant this application access.
///
/// Parameters appear in a fixed order so identical inputs always produce the
/// same URL. `locale` falls back to `options.default_locale`; blank values of
/// either are omitted, as is a blank `state`.
pub fn build_consent_url(
    options: &OAuthOptions,
    state: Option<&str>,
    prompt_login: bool,
    locale: Option<&str>,
) -> Result<Url> {
    let mut pairs: Vec<(&str, &str)> = vec![("client_id", options.client_id.as_str())];

    if let Some(locale) = non_blank(locale).or_else(|| non_blank(options.default_locale.as_deref()))
    {
        pairs.push(("locale", locale));
    }
    if prompt_login {
        pairs.push(("prompt", "login"));
    }
    pairs.push(("redirect_uri", options.ru_name.as_str()));
    pairs.push(("response_type", "code"));
    pairs.push(("scope", options.scopes.as_str()));
    if let Some(state) = non_blank(state) {
        pairs.push(("state", state));
    }

    let raw = format!(
        "{}{}?{}",
        options.environment.auth_origin(),
        AUTHORIZE_PATH,
        encode_query(&pairs)
    );
    Url::parse(&raw)
        .map_err(|e| Error::config("environment", format!("produces an invalid consent URL: {e}")))
}

/// Generate a random opaque `state` value for CSRF protection.
///
/// 32 random bytes as URL-safe base64 without padding (43 characters), so it
/// survives the round trip through the consent redirect unescaped.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
