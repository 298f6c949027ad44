//! Token endpoint requests
//!
//! All three grants POST a form body to `{api}/identity/v1/oauth2/token` with
//! the keyset as HTTP Basic credentials. The user-token grants
//! (authorization code, refresh) live on [`OAuthClient`]; the
//! client-credentials grant is exposed through
//! [`crate::AppClient::get_application_token`].

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::consent::build_consent_url;
use crate::credentials::encode_basic_credentials;
use crate::error::{Error, Result};
use crate::options::OAuthOptions;

/// Tokens returned when an authorization code is exchanged.
///
/// `expires_in_seconds` is a delta from the response time, not a timestamp.
/// Keys eBay adds later land in `extra`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorizationCodeTokenResponse {
    pub access_token: String,
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: u64,
    #[serde(default)]
    pub token_type: String,
    pub refresh_token: String,
    #[serde(
        rename = "refresh_token_expires_in",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_token_expires_in_seconds: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// New user access token minted from a refresh token.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: u64,
    #[serde(default)]
    pub token_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Application access token from the client-credentials grant.
///
/// Application tokens cannot be refreshed; request a new one after expiry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationTokenResponse {
    pub access_token: String,
    #[serde(rename = "expires_in")]
    pub expires_in_seconds: u64,
    #[serde(default)]
    pub token_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// POST one grant to the token endpoint and decode the JSON reply.
///
/// `form` is serialized with standard form encoding exactly once; values are
/// sent as given.
pub(crate) async fn request_token<T: DeserializeOwned>(
    http: &reqwest::Client,
    options: &OAuthOptions,
    grant_type: &str,
    form: &[(&str, &str)],
) -> Result<T> {
    let endpoint = options.token_endpoint();
    let credentials = encode_basic_credentials(&options.client_id, options.client_secret.expose());

    debug!(grant_type, endpoint = %endpoint, "requesting token");

    let response = http
        .post(&endpoint)
        .header(AUTHORIZATION, format!("Basic {credentials}"))
        .header(ACCEPT, "application/json")
        .timeout(options.timeout())
        .form(form)
        .send()
        .await
        .map_err(|e| Error::from_reqwest("token request", e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        warn!(grant_type, status = status.as_u16(), "token endpoint rejected request");
        // Canonical phrase for the status code, not the server's own wording
        return Err(Error::TokenRequest {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| Error::from_reqwest("reading token response", e))?;

    serde_json::from_str(&body)
        .map_err(|e| Error::Deserialization(format!("invalid {grant_type} token response: {e}")))
}

/// Mint an application token with the client-credentials grant.
///
/// Sends only `grant_type` unless `scopes` is given and non-blank, in which
/// case it is sent as `scope`. `options` must already be validated.
pub(crate) async fn application_token(
    http: &reqwest::Client,
    options: &OAuthOptions,
    scopes: Option<&str>,
) -> Result<ApplicationTokenResponse> {
    let mut form = vec![("grant_type", "client_credentials")];
    if let Some(scopes) = scopes.filter(|s| !s.trim().is_empty()) {
        form.push(("scope", scopes));
    }
    request_token(http, options, "client_credentials", &form).await
}

/// Client for the user-consent flow: consent URL, code exchange, refresh.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    options: OAuthOptions,
}

impl OAuthClient {
    /// Validate `options` and build a client with its own connection pool.
    pub fn new(options: OAuthOptions) -> Result<Self> {
        Self::with_http_client(options, reqwest::Client::new())
    }

    /// Validate `options` and build a client sharing an existing pool.
    pub fn with_http_client(options: OAuthOptions, http: reqwest::Client) -> Result<Self> {
        options.validate()?;
        Ok(Self { http, options })
    }

    pub fn options(&self) -> &OAuthOptions {
        &self.options
    }

    /// Consent URL for this client's options. See [`build_consent_url`].
    pub fn consent_url(
        &self,
        state: Option<&str>,
        prompt_login: bool,
        locale: Option<&str>,
    ) -> Result<Url> {
        build_consent_url(&self.options, state, prompt_login, locale)
    }

    /// Exchange the authorization code from the consent redirect for tokens.
    ///
    /// eBay hands the code over already URL-encoded. Pass it exactly as it
    /// appeared in the redirect; it is form-encoded once more on the wire, and
    /// eBay decodes it once, so nothing here may decode or re-encode it first.
    pub async fn exchange_code_for_tokens(
        &self,
        code: &str,
    ) -> Result<AuthorizationCodeTokenResponse> {
        request_token(
            &self.http,
            &self.options,
            "authorization_code",
            &[
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.options.ru_name.as_str()),
                ("code", code),
            ],
        )
        .await
    }

    /// Mint a new user access token from a refresh token.
    ///
    /// `scopes` must equal or narrow the originally consented scopes; blank or
    /// absent falls back to the configured scopes.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
        scopes: Option<&str>,
    ) -> Result<RefreshTokenResponse> {
        let scope = scopes
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.options.scopes);
        request_token(
            &self.http,
            &self.options,
            "refresh_token",
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("scope", scope),
            ],
        )
        .await
    }
}
