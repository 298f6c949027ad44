//! Client options and validation
//!
//! One `OAuthOptions` value is built by the host at startup and handed to
//! each client. Clients validate on construction and keep their own copy, so
//! options never change after the first request.

use std::time::Duration;

use serde::Deserialize;

use crate::constants::{
    PRODUCTION_API_ORIGIN, PRODUCTION_AUTH_ORIGIN, SANDBOX_API_ORIGIN, SANDBOX_AUTH_ORIGIN,
};
use crate::error::{Error, Result};
use crate::secret::Secret;

/// eBay environment. Must match the keyset and RuName registered in the
/// developer portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// Origin serving the user consent page.
    pub fn auth_origin(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_AUTH_ORIGIN,
            Self::Production => PRODUCTION_AUTH_ORIGIN,
        }
    }

    /// Origin serving the token endpoint and REST APIs.
    pub fn api_origin(self) -> &'static str {
        match self {
            Self::Sandbox => SANDBOX_API_ORIGIN,
            Self::Production => PRODUCTION_API_ORIGIN,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Keyset, RuName and scope configuration shared by both clients.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthOptions {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Secret<String>,
    /// eBay's RuName: the registered name standing in for a redirect URL.
    /// Sent wherever OAuth expects `redirect_uri`.
    pub ru_name: String,
    /// Space-separated list of full scope URLs.
    pub scopes: String,
    #[serde(default)]
    pub environment: Environment,
    /// Consent page locale used when the caller passes none, e.g. "de-DE".
    #[serde(default)]
    pub default_locale: Option<String>,
    /// Overrides the environment's API origin (reverse proxies, local mocks).
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OAuthOptions {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        ru_name: impl Into<String>,
        scopes: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            ru_name: ru_name.into(),
            scopes: scopes.into(),
            environment,
            default_locale: None,
            api_base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Check that every required field is present.
    ///
    /// Blank (whitespace-only) values count as missing. The error names the
    /// first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::config("client_id", "is required"));
        }
        if self.client_secret.is_blank() {
            return Err(Error::config("client_secret", "is required"));
        }
        if self.ru_name.trim().is_empty() {
            return Err(Error::config("ru_name", "(RuName) is required"));
        }
        if self.scopes.trim().is_empty() {
            return Err(Error::config(
                "scopes",
                "are required (space-separated scope URLs)",
            ));
        }

        if let Some(ref base) = self.api_base_url {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(Error::config(
                    "api_base_url",
                    format!("must start with http:// or https://, got: {base}"),
                ));
            }
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs", "must be greater than 0"));
        }

        Ok(())
    }

    /// API origin without a trailing slash.
    pub fn api_origin(&self) -> &str {
        self.api_base_url
            .as_deref()
            .map(|base| base.trim_end_matches('/'))
            .unwrap_or_else(|| self.environment.api_origin())
    }

    /// Full token endpoint URL for the configured environment.
    pub fn token_endpoint(&self) -> String {
        format!("{}{}", self.api_origin(), crate::constants::TOKEN_PATH)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> OAuthOptions {
        OAuthOptions::new(
            "cid",
            "secret",
            "Ru-1",
            "scopeA scopeB",
            Environment::Sandbox,
        )
    }

    #[test]
    fn valid_options_pass() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn each_blank_required_field_is_named() {
        let cases: [(&str, fn(&mut OAuthOptions)); 4] = [
            ("client_id", |o| o.client_id = "  ".into()),
            ("client_secret", |o| o.client_secret = Secret::from("")),
            ("ru_name", |o| o.ru_name = "\t".into()),
            ("scopes", |o| o.scopes = String::new()),
        ];

        for (expected, blank) in cases {
            let mut options = valid();
            blank(&mut options);
            match options.validate() {
                Err(Error::Configuration { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected configuration error for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_http_base_url() {
        let options = valid().with_api_base_url("ftp://example.com");
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("api_base_url"), "got: {err}");
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = valid().with_timeout_secs(0).validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"), "got: {err}");
    }

    #[test]
    fn token_endpoint_follows_environment() {
        assert_eq!(
            valid().token_endpoint(),
            "https://api.sandbox.ebay.com/identity/v1/oauth2/token"
        );

        let mut production = valid();
        production.environment = Environment::Production;
        assert_eq!(
            production.token_endpoint(),
            "https://api.ebay.com/identity/v1/oauth2/token"
        );
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let options = valid().with_api_base_url("http://127.0.0.1:9000/");
        assert_eq!(options.api_origin(), "http://127.0.0.1:9000");
        assert_eq!(
            options.token_endpoint(),
            "http://127.0.0.1:9000/identity/v1/oauth2/token"
        );
    }

    #[test]
    fn environment_deserializes_lowercase() {
        let env: Environment = serde_json::from_str(r#""production""#).unwrap();
        assert_eq!(env, Environment::Production);
        assert_eq!(Environment::default(), Environment::Sandbox);
    }
}
