//! Mock-server fixtures shared by the unit tests

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::SignClient;
use crate::credentials::ClientCredentials;

pub const CLIENT_ID: &str = "CBJCHBCAABAAtest";
pub const CLIENT_SECRET: &str = "client-secret-value";
pub const REDIRECT_URL: &str = "https://localhost:5000/adobe_sign/oauth_redirect";

/// Client whose fixed provider URLs point at the mock server.
pub fn mock_client(server: &MockServer) -> SignClient {
    SignClient::new(
        reqwest::Client::new(),
        ClientCredentials::new(CLIENT_ID, CLIENT_SECRET, REDIRECT_URL),
    )
    .with_authorize_url(format!("{}/public/oauth", server.uri()))
    .with_discovery_url(format!("{}/base_uris", server.uri()))
}

/// Answer `base_uris` with the mock server itself as the access point.
pub async fn mount_discovery(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/base_uris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "api_access_point": format!("{}/", server.uri()),
            "web_access_point": format!("{}/", server.uri()),
        })))
        .mount(server)
        .await;
}
