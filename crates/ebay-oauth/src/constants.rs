//! eBay endpoint and scope constants
//!
//! Hosts are split by environment; paths are shared between sandbox and
//! production. Scope values are full URLs and are always sent space-delimited.

/// Authorization (consent page) origin, sandbox
pub const SANDBOX_AUTH_ORIGIN: &str = "https://auth.sandbox.ebay.com";

/// Authorization (consent page) origin, production
pub const PRODUCTION_AUTH_ORIGIN: &str = "https://auth.ebay.com";

/// REST API origin, sandbox. Hosts both the token endpoint and the Browse API.
pub const SANDBOX_API_ORIGIN: &str = "https://api.sandbox.ebay.com";

/// REST API origin, production
pub const PRODUCTION_API_ORIGIN: &str = "https://api.ebay.com";

/// Path of the consent page on the authorization origin
pub const AUTHORIZE_PATH: &str = "/oauth2/authorize";

/// Path of the token endpoint on the API origin
pub const TOKEN_PATH: &str = "/identity/v1/oauth2/token";

/// Path of the Browse item summary search
pub const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";

/// Header selecting the marketplace for Browse API calls (`X-EBAY-C-MARKETPLACE-ID`).
/// Lowercase, as HTTP/2 requires.
pub const MARKETPLACE_ID_HEADER: &str = "x-ebay-c-marketplace-id";

/// Marketplace sent with every application call
pub const MARKETPLACE_ID: &str = "EBAY_US";

/// Accept-Language sent with every application call
pub const ACCEPT_LANGUAGE: &str = "en-US";

/// Filter applied to the sample search: auctions and fixed price, $50-$500.
pub const SEARCH_FILTER: &str = "buyingOptions:{AUCTION | FIXED_PRICE},price:[50..500]";

/// Result cap used when the caller does not pass one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Common prefix of every eBay OAuth scope URL
pub const SCOPE_PREFIX: &str = "https://api.ebay.com/oauth/api_scope/";

/// Read a buyer's order history
pub const SCOPE_BUY_ORDER_READONLY: &str = "https://api.ebay.com/oauth/api_scope/buy.order.readonly";

/// Guest checkout orders
pub const SCOPE_BUY_GUEST_ORDER: &str = "https://api.ebay.com/oauth/api_scope/buy.guest.order";

/// Seller account settings
pub const SCOPE_SELL_ACCOUNT: &str = "https://api.ebay.com/oauth/api_scope/sell.account";

/// Seller inventory and offers
pub const SCOPE_SELL_INVENTORY: &str = "https://api.ebay.com/oauth/api_scope/sell.inventory";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_share_prefix() {
        for scope in [
            SCOPE_BUY_ORDER_READONLY,
            SCOPE_BUY_GUEST_ORDER,
            SCOPE_SELL_ACCOUNT,
            SCOPE_SELL_INVENTORY,
        ] {
            assert!(scope.starts_with(SCOPE_PREFIX), "bad scope: {scope}");
            assert!(!scope.contains(' '), "scope must be a single token: {scope}");
        }
    }

    #[test]
    fn paths_are_absolute() {
        for path in [AUTHORIZE_PATH, TOKEN_PATH, SEARCH_PATH] {
            assert!(path.starts_with('/'), "path must start with '/': {path}");
        }
    }
}
