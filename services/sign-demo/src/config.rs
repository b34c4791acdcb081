//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from the ADOBE_SIGN_CLIENT_SECRET env var or
//! client_secret_file, never stored in the TOML directly.

use adobe_sign::ClientCredentials;
use common::Secret;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Env var holding the OAuth client secret
pub const CLIENT_SECRET_ENV: &str = "ADOBE_SIGN_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub adobe_sign: AdobeSignConfig,
    pub server: ServerConfig,
    pub recipient: RecipientConfig,
    #[serde(default)]
    pub merge_fields: Vec<MergeFieldConfig>,
}

/// OAuth application settings from Adobe Sign > API > API Applications
#[derive(Debug, Deserialize)]
pub struct AdobeSignConfig {
    pub client_id: String,
    /// Must exactly match a redirect URI registered for the application
    pub redirect_url: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    /// Log successful Adobe Sign response bodies at debug level
    #[serde(default)]
    pub log_responses: bool,
}

/// HTTP listener and demo flow settings
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// PDF uploaded as the widget's document
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,
    /// Where the signer is sent after completing the widget
    pub completion_url: String,
    /// Library document whose form fields are layered onto the PDF
    #[serde(default)]
    pub form_fields_document: Option<String>,
}

/// Signer invited through the widget
#[derive(Debug, Clone, Deserialize)]
pub struct RecipientConfig {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

/// Form field pre-filled in the widget
#[derive(Debug, Clone, Deserialize)]
pub struct MergeFieldConfig {
    pub field_name: String,
    pub default_value: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_connections() -> usize {
    256
}

fn default_document_path() -> PathBuf {
    PathBuf::from("example.pdf")
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. ADOBE_SIGN_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if !config.adobe_sign.redirect_url.starts_with("http://")
            && !config.adobe_sign.redirect_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "redirect_url must start with http:// or https://, got: {}",
                config.adobe_sign.redirect_url
            )));
        }

        if config.adobe_sign.client_id.trim().is_empty() {
            return Err(common::Error::Config("client_id must not be empty".into()));
        }

        if config.server.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if config.server.max_connections == 0 {
            return Err(common::Error::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        // Env var takes precedence over file
        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.adobe_sign.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.adobe_sign.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            config.adobe_sign.client_secret = Some(Secret::new(secret.trim().to_owned()));
        }

        match config.adobe_sign.client_secret {
            Some(ref secret) if !secret.is_blank() => {}
            _ => {
                return Err(common::Error::Config(format!(
                    "client secret missing: set {CLIENT_SECRET_ENV} or client_secret_file"
                )));
            }
        }

        Ok(config)
    }

    /// OAuth credentials for the Adobe Sign client.
    pub fn client_credentials(&self) -> common::Result<ClientCredentials> {
        let secret = self
            .adobe_sign
            .client_secret
            .clone()
            .ok_or_else(|| common::Error::Config("client secret not loaded".into()))?;
        Ok(ClientCredentials::new(
            self.adobe_sign.client_id.clone(),
            secret,
            self.adobe_sign.redirect_url.clone(),
        ))
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("adobe-sign-demo.toml")
    }
}
