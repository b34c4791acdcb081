//! Adobe Sign API client
//!
//! `SignClient` owns the OAuth application credentials, an injected
//! `reqwest::Client`, and the account's API access point once discovered.
//! Every call issues at most one request; there is no retry layer. A call
//! succeeds only on HTTP 200 or 201. Any other status is logged with its body
//! and returned as a classified `Error`.
//!
//! The access point is memoized for the lifetime of the client and never
//! invalidated. A token for a different account would reuse the first
//! account's regional endpoint, so use one client per account.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::constants::{ACCESS_TOKEN_HEADER, API_BASE_PATH, AUTHORIZE_URL, DISCOVERY_URL};
use crate::credentials::{AccessToken, ClientCredentials};
use crate::error::{Error, Result};

/// Body of the `base_uris` discovery call.
#[derive(Debug, Deserialize)]
struct BaseUris {
    api_access_point: Option<String>,
}

/// Client for the Adobe Sign REST API v5.
#[derive(Debug)]
pub struct SignClient {
    pub(crate) http: reqwest::Client,
    pub(crate) credentials: ClientCredentials,
    pub(crate) authorize_url: String,
    discovery_url: String,
    api_access_point: OnceCell<String>,
    log_responses: bool,
}

impl SignClient {
    pub fn new(http: reqwest::Client, credentials: ClientCredentials) -> Self {
        Self {
            http,
            credentials,
            authorize_url: AUTHORIZE_URL.to_string(),
            discovery_url: DISCOVERY_URL.to_string(),
            api_access_point: OnceCell::new(),
            log_responses: false,
        }
    }

    /// Override the OAuth authorize page (regional shards, tests).
    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// Override the `base_uris` discovery URL.
    pub fn with_discovery_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_url = url.into();
        self
    }

    /// Log successful response bodies at debug level.
    ///
    /// Off by default: bodies carry document ids and widget embed codes.
    pub fn with_response_logging(mut self, enabled: bool) -> Self {
        self.log_responses = enabled;
        self
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// The account's API access point, e.g. `https://api.na1.echosign.com/`.
    ///
    /// Returned from memory after the first successful discovery; otherwise
    /// one GET to the discovery URL. A failed discovery is not cached.
    /// Concurrent first calls share a single request.
    pub async fn api_access_point(&self, token: &AccessToken) -> Result<&str> {
        if let Some(point) = self.api_access_point.get() {
            return Ok(point.as_str());
        }
        require_token(token)?;

        self.api_access_point
            .get_or_try_init(|| self.discover_access_point(token))
            .await
            .map(String::as_str)
    }

    /// REST base URL: the access point plus `api/rest/v5/`.
    pub async fn api_base_url(&self, token: &AccessToken) -> Result<String> {
        let point = self.api_access_point(token).await?;
        Ok(join_url(point, API_BASE_PATH))
    }

    async fn discover_access_point(&self, token: &AccessToken) -> Result<String> {
        let response = self
            .http
            .get(&self.discovery_url)
            .header(ACCESS_TOKEN_HEADER, token.expose())
            .send()
            .await
            .map_err(|e| Error::Http(format!("base_uris request failed: {e}")))?;

        let body: BaseUris = self.read_json("base_uris", response).await?;
        let point = body
            .api_access_point
            .ok_or(Error::MissingField("api_access_point"))?;
        debug!(api_access_point = %point, "discovered API access point");
        Ok(point)
    }

    /// Authenticated JSON POST to `{base}{path}`.
    ///
    /// Shared by widget creation and usable for any other v5 endpoint that
    /// takes a JSON body. The response is deserialized into `R`; use
    /// `serde_json::Value` for untyped access.
    pub async fn post_json<B, R>(&self, token: &AccessToken, path: &str, payload: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        require_token(token)?;
        let url = join_url(&self.api_base_url(token).await?, path);

        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, token.expose())
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::Http(format!("POST {path} failed: {e}")))?;

        debug!(path, status = response.status().as_u16(), "POST returned");
        self.read_json(path, response).await
    }

    /// Authenticated GET to `{base}{path}`.
    pub(crate) async fn get_json<R: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
    ) -> Result<R> {
        require_token(token)?;
        let url = join_url(&self.api_base_url(token).await?, path);

        let response = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, token.expose())
            .send()
            .await
            .map_err(|e| Error::Http(format!("GET {path} failed: {e}")))?;

        self.read_json(path, response).await
    }

    /// Branch on status, then parse the body.
    pub(crate) async fn read_json<R: DeserializeOwned>(
        &self,
        operation: &str,
        response: Response,
    ) -> Result<R> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("{operation}: reading response body failed: {e}")))?;

        if !is_success(status) {
            warn!(
                operation,
                status = status.as_u16(),
                body = %body,
                "Adobe Sign call failed"
            );
            return Err(Error::from_status(status, body));
        }

        if self.log_responses {
            debug!(operation, status = status.as_u16(), body = %body, "Adobe Sign response");
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(format!("{operation}: {e}")))
    }
}

/// Adobe Sign answers 200 or 201 on success; nothing else counts.
fn is_success(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 201)
}

pub(crate) fn require_token(token: &AccessToken) -> Result<()> {
    if token.is_empty() {
        return Err(Error::MissingInput("access token"));
    }
    Ok(())
}

/// Join a base URL and a relative path with exactly one slash between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
