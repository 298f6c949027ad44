//! Application client: app token plus authenticated Browse API calls
//!
//! `initialize()` mints an application token and builds the default headers
//! for later calls; `search()` uses them. The token is held in memory only and
//! is never refreshed here, so hosts re-run `initialize()` after expiry.
//!
//! The ready state sits behind an async RwLock. `initialize()` holds the write
//! lock across the token request, which serializes concurrent initializations;
//! `search()` clones the header snapshot under a read lock.

use reqwest::header::{ACCEPT_LANGUAGE, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::consent::encode_query;
use crate::constants::{
    ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_VALUE, MARKETPLACE_ID, MARKETPLACE_ID_HEADER, SEARCH_FILTER,
    SEARCH_PATH,
};
use crate::error::{Error, Result};
use crate::options::OAuthOptions;
use crate::secret::Secret;
use crate::token::{ApplicationTokenResponse, application_token};

/// Token and headers established by a successful `initialize()`.
struct Session {
    token: Secret<String>,
    headers: HeaderMap,
}

/// Client for calls made as the application rather than a user.
pub struct AppClient {
    http: reqwest::Client,
    options: OAuthOptions,
    session: RwLock<Option<Session>>,
}

impl AppClient {
    /// Validate `options` and build a client with its own connection pool.
    pub fn new(options: OAuthOptions) -> Result<Self> {
        Self::with_http_client(options, reqwest::Client::new())
    }

    /// Validate `options` and build a client sharing an existing pool.
    pub fn with_http_client(options: OAuthOptions, http: reqwest::Client) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            http,
            options,
            session: RwLock::new(None),
        })
    }

    pub fn options(&self) -> &OAuthOptions {
        &self.options
    }

    /// Whether a token is currently held.
    pub async fn is_initialized(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// The application token held since the last successful `initialize()`.
    pub async fn access_token(&self) -> Option<Secret<String>> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    /// Mint an application token with the client-credentials grant.
    ///
    /// Does not touch the client's session; see [`AppClient::initialize`].
    pub async fn get_application_token(
        &self,
        scopes: Option<&str>,
    ) -> Result<ApplicationTokenResponse> {
        application_token(&self.http, &self.options, scopes).await
    }

    /// Acquire an application token and make it the bearer for later calls.
    ///
    /// Returns `Ok(false)` and clears any previous session when eBay answers
    /// with an empty token. On error the previous session is left in place.
    pub async fn initialize(&self) -> Result<bool> {
        let mut session = self.session.write().await;

        let token = self.get_application_token(None).await?;
        if token.access_token.is_empty() {
            warn!("token endpoint returned an empty application token");
            *session = None;
            return Ok(false);
        }

        let headers = session_headers(&token.access_token)?;
        *session = Some(Session {
            token: Secret::new(token.access_token),
            headers,
        });

        info!(
            expires_in = token.expires_in_seconds,
            token_type = %token.token_type,
            "application token acquired"
        );
        Ok(true)
    }

    /// Run a Browse item summary search and return the raw JSON body.
    ///
    /// Applies the fixed marketplace filter
    /// `buyingOptions:{AUCTION | FIXED_PRICE},price:[50..500]`.
    pub async fn search(&self, query: &str, limit: u32) -> Result<String> {
        let headers = {
            let session = self.session.read().await;
            session
                .as_ref()
                .map(|s| s.headers.clone())
                .ok_or(Error::NotInitialized)?
        };

        let limit = limit.to_string();
        let url = format!(
            "{}{}?{}",
            self.options.api_origin(),
            SEARCH_PATH,
            encode_query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("filter", SEARCH_FILTER),
            ])
        );

        debug!(query, limit = %limit, "searching item summaries");

        let response = self
            .http
            .get(&url)
            .headers(headers)
            .timeout(self.options.timeout())
            .send()
            .await
            .map_err(|e| Error::from_reqwest("search request", e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "search request failed");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| Error::from_reqwest("reading search response", e))
    }
}

/// Default headers for application calls made with `access_token`.
fn session_headers(access_token: &str) -> Result<HeaderMap> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
        .map_err(|_| Error::Deserialization("access token is not a valid header value".into()))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(
        HeaderName::from_static(MARKETPLACE_ID_HEADER),
        HeaderValue::from_static(MARKETPLACE_ID),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
    );
    Ok(headers)
}
