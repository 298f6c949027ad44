//! eBay OAuth and REST client library
//!
//! Mints application and user access tokens against eBay's identity service,
//! builds user consent URLs, and runs an authenticated Browse search. Nothing
//! here stores tokens, schedules refreshes or retries; the host owns all of
//! that.
//!
//! User token flow:
//! 1. Host builds an [`OAuthOptions`] and an [`OAuthClient`]
//! 2. User is redirected to [`OAuthClient::consent_url`]
//! 3. The code from the redirect goes to [`OAuthClient::exchange_code_for_tokens`]
//! 4. Later, [`OAuthClient::refresh_access_token`] mints a new access token
//!
//! Application flow: [`AppClient::initialize`] then [`AppClient::search`].

pub mod app;
pub mod consent;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod options;
pub mod secret;
pub mod token;

#[cfg(test)]
mod test_support;

pub use app::AppClient;
pub use consent::{build_consent_url, generate_state};
pub use credentials::encode_basic_credentials;
pub use error::{Error, Result};
pub use options::{Environment, OAuthOptions};
pub use secret::Secret;
pub use token::{
    ApplicationTokenResponse, AuthorizationCodeTokenResponse, OAuthClient, RefreshTokenResponse,
};
