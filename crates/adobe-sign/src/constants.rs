//! Adobe Sign REST API v5 constants
//!
//! The OAuth authorize page and the `base_uris` discovery call live on fixed
//! hosts. Everything else is served from the account's regional API access
//! point, which is only known after discovery.

/// Authorization page the user is sent to for consent
pub const AUTHORIZE_URL: &str = "https://secure.na1.echosign.com/public/oauth";

/// Endpoint discovery call returning the account's `api_access_point`
pub const DISCOVERY_URL: &str = "https://api.echosign.com/api/rest/v5/base_uris";

/// REST path appended to the regional access point
pub const API_BASE_PATH: &str = "api/rest/v5/";

/// Token exchange path, relative to the access point from the OAuth redirect
pub const TOKEN_PATH: &str = "oauth/token";

/// Header carrying the OAuth access token on authenticated calls
pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// MIME type declared for uploaded transient documents
pub const PDF_MIME_TYPE: &str = "application/pdf";
