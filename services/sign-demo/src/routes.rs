//! Demo routes chaining the Adobe Sign client calls
//!
//! - GET /                           : authorization URL, echoes `token` if present
//! - GET /adobe_sign/oauth_redirect  : exchange code, redirect to `/?token=...`
//! - GET /show_library_documents     : list library documents
//! - GET /show_iframe                : upload PDF, create widget, embed it
//!
//! The access token travels in the `token` query parameter between pages.
//! That is fine for a local demo and nothing else.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use adobe_sign::{
    AccessToken, FileInfo, RecipientRole, SignClient, WidgetCompletionInfo, WidgetCreationInfo,
    find_library_document_by_name,
};
use axum::Router;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::get;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{Config, MergeFieldConfig, RecipientConfig};
use crate::error::{Error, Result};
use crate::metrics;

/// Scopes needed to read the library and create widgets.
pub const OAUTH_SCOPE: &str = "user_login:self library_read:account widget_write:account";

/// Maximum age of an issued OAuth state before it expires.
const STATE_EXPIRY: Duration = Duration::from_secs(600);

/// Name given to widgets created by the demo.
const WIDGET_NAME: &str = "OurCompany Contract with client X";

/// Settings for the widget flow, taken from `Config`.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub document_path: PathBuf,
    pub completion_url: String,
    pub form_fields_document: Option<String>,
    pub recipient: RecipientConfig,
    pub merge_fields: Vec<MergeFieldConfig>,
}

impl WidgetSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            document_path: config.server.document_path.clone(),
            completion_url: config.server.completion_url.clone(),
            form_fields_document: config.server.form_fields_document.clone(),
            recipient: config.recipient.clone(),
            merge_fields: config.merge_fields.clone(),
        }
    }

    fn widget_info(&self, transient_document_id: String) -> WidgetCreationInfo {
        let info = WidgetCreationInfo::new(WIDGET_NAME)
            .with_file(FileInfo::transient(transient_document_id))
            .with_recipient(self.recipient.email.clone(), RecipientRole::Signer)
            .with_completion(WidgetCompletionInfo {
                url: self.completion_url.clone(),
                deframe: true,
                delay: 0,
            });

        self.merge_fields.iter().fold(info, |info, field| {
            info.with_merge_field(field.field_name.clone(), field.default_value.clone())
        })
    }
}

/// Shared state for demo route handlers.
#[derive(Clone)]
pub struct DemoState {
    client: Arc<SignClient>,
    widget: Arc<WidgetSettings>,
    /// OAuth states handed out by `/`, consumed by the redirect.
    pending_states: Arc<Mutex<HashMap<String, Instant>>>,
}

impl DemoState {
    pub fn new(client: Arc<SignClient>, widget: WidgetSettings) -> Self {
        Self {
            client,
            widget: Arc::new(widget),
            pending_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn issue_state(&self) -> String {
        let oauth_state = uuid::Uuid::new_v4().as_simple().to_string();
        let mut states = self.pending_states.lock().await;
        states.retain(|_, issued| issued.elapsed() < STATE_EXPIRY);
        states.insert(oauth_state.clone(), Instant::now());
        oauth_state
    }

    /// Remove `oauth_state` from the pending set. Each state is accepted once.
    async fn consume_state(&self, oauth_state: &str) -> Result<()> {
        let issued = self.pending_states.lock().await.remove(oauth_state);
        match issued {
            Some(issued) if issued.elapsed() < STATE_EXPIRY => Ok(()),
            _ => Err(Error::InvalidState),
        }
    }
}

/// Build the demo router. Each matched route is timed for `/metrics`.
pub fn build_demo_router(state: DemoState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/adobe_sign/oauth_redirect", get(oauth_redirect))
        .route("/show_library_documents", get(show_library_documents))
        .route("/show_iframe", get(show_iframe))
        .route_layer(axum::middleware::from_fn(metrics::track_requests))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl TokenQuery {
    fn access_token(&self) -> AccessToken {
        AccessToken::new(self.token.clone().unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct RedirectQuery {
    code: Option<String>,
    api_access_point: Option<String>,
    state: Option<String>,
}

/// GET /: the link that starts the OAuth flow.
async fn home(
    State(state): State<DemoState>,
    Query(query): Query<TokenQuery>,
) -> impl IntoResponse {
    let oauth_state = state.issue_state().await;
    let authorization_url = state.client.authorization_url(OAUTH_SCOPE, &oauth_state);

    axum::Json(serde_json::json!({
        "authorization_url": authorization_url,
        "state": oauth_state,
        "token": query.token,
    }))
}

/// GET /adobe_sign/oauth_redirect: Adobe Sign sends the user back here.
///
/// The `state` must be one issued by `/` and not yet used.
async fn oauth_redirect(
    State(state): State<DemoState>,
    Query(query): Query<RedirectQuery>,
) -> Result<Redirect> {
    state
        .consume_state(query.state.as_deref().unwrap_or_default())
        .await?;

    let token = state
        .client
        .exchange_code(
            query.code.as_deref().unwrap_or_default(),
            query.api_access_point.as_deref().unwrap_or_default(),
        )
        .await?;

    info!("OAuth redirect completed");
    Ok(Redirect::to(&format!(
        "/?token={}",
        urlencoding::encode(token.expose())
    )))
}

/// GET /show_library_documents: id and name of each library document.
async fn show_library_documents(
    State(state): State<DemoState>,
    Query(query): Query<TokenQuery>,
) -> Result<impl IntoResponse> {
    let documents = state
        .client
        .library_documents(&query.access_token())
        .await?;

    let listing: Vec<_> = documents
        .iter()
        .map(|doc| serde_json::json!({ "id": doc.id, "name": doc.name }))
        .collect();

    Ok(axum::Json(serde_json::json!({
        "count": listing.len(),
        "documents": listing,
    })))
}

/// GET /show_iframe: upload the configured PDF and embed a signing widget.
async fn show_iframe(
    State(state): State<DemoState>,
    Query(query): Query<TokenQuery>,
) -> Result<Html<String>> {
    let token = query.access_token();
    let settings = &state.widget;

    let document_id = state
        .client
        .upload_transient_document(&token, &settings.document_path)
        .await?;

    let mut info = settings.widget_info(document_id);
    if let Some(ref template_name) = settings.form_fields_document {
        let documents = state.client.library_documents(&token).await?;
        let template_id = find_library_document_by_name(&documents, template_name)
            .ok_or_else(|| Error::TemplateNotFound(template_name.clone()))?;
        info = info.with_form_field_layer(FileInfo::library(template_id));
    }

    info!(
        recipient = %settings.recipient.name,
        email = %settings.recipient.email,
        "creating widget"
    );
    let widget = state.client.create_widget(&token, &info).await?;
    let embed = match (widget.javascript, widget.url) {
        (Some(javascript), _) => javascript,
        (None, Some(url)) => format!(
            r#"<iframe src="{}" width="100%" height="100%" frameborder="0" style="border: 0; overflow: hidden; min-height: 500px; min-width: 600px;"></iframe>"#,
            escape_html(&url)
        ),
        (None, None) => return Err(Error::EmptyWidget),
    };

    Ok(Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{WIDGET_NAME}</title></head>\n<body>\n{embed}\n</body>\n</html>\n"
    )))
}

/// Escape text for an HTML attribute value or element body.
fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
