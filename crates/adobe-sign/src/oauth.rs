//! OAuth authorization-code flow
//!
//! 1. Send the user to `authorization_url()`.
//! 2. Adobe Sign redirects back with `code`, `api_access_point` and `state`.
//! 3. `exchange_code()` trades the code for an access token at
//!    `{api_access_point}/oauth/token`.

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{SignClient, join_url};
use crate::constants::TOKEN_PATH;
use crate::credentials::AccessToken;
use crate::error::{Error, Result};

/// Token endpoint response. Only the access token is used; refresh tokens
/// are not handled by this client.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl SignClient {
    /// Build the authorize page URL the user is redirected to.
    ///
    /// `scope` is passed through unvalidated, e.g.
    /// `"user_login:self library_read:account widget_write:account"`.
    /// `state` is returned unchanged in the redirect. Every value is
    /// percent-encoded.
    pub fn authorization_url(&self, scope: &str, state: &str) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(self.credentials.client_id()),
            urlencoding::encode(self.credentials.redirect_url()),
            urlencoding::encode(scope),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// `api_access_point` is the origin Adobe Sign passed to the redirect URL
    /// alongside the code. Both must be non-empty; otherwise no request is
    /// made.
    pub async fn exchange_code(
        &self,
        authorization_code: &str,
        api_access_point: &str,
    ) -> Result<AccessToken> {
        if authorization_code.is_empty() {
            return Err(Error::MissingInput("authorization code"));
        }
        if api_access_point.is_empty() {
            return Err(Error::MissingInput("api_access_point"));
        }

        let url = join_url(api_access_point, TOKEN_PATH);
        let response = self
            .http
            .post(&url)
            .form(&[
                ("code", authorization_code),
                ("client_id", self.credentials.client_id()),
                ("client_secret", self.credentials.client_secret().expose()),
                ("redirect_uri", self.credentials.redirect_url()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(format!("token exchange request failed: {e}")))?;

        let body: TokenResponse = self.read_json("oauth/token", response).await?;
        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingField("access_token"))?;

        debug!(expires_in = ?body.expires_in, "token exchange succeeded");
        info!(api_access_point, "obtained Adobe Sign access token");
        Ok(AccessToken::new(access_token))
    }
}
