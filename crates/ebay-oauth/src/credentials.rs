//! HTTP Basic client credentials for the token endpoint

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encode `client_id:client_secret` as standard padded base64.
///
/// The result is the value after `Basic ` in the Authorization header.
pub fn encode_basic_credentials(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{client_secret}"))
}
