//! Signing widgets
//!
//! A widget is a provider-hosted signing form built from a document and a
//! recipient configuration. Request and response bodies are typed so that a
//! misspelled field name is a compile error instead of a silently ignored
//! key.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::SignClient;
use crate::credentials::AccessToken;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureType {
    Esign,
    Written,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignatureFlow {
    SenderSignatureNotRequired,
    SenderSignsLast,
    SenderSignsFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientRole {
    Signer,
    Approver,
    DelegateToSigner,
    DelegateToApprover,
}

/// Reference to a document by exactly one of its identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient_document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_document_name: Option<String>,
}

impl FileInfo {
    pub fn transient(id: impl Into<String>) -> Self {
        Self {
            transient_document_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn library(id: impl Into<String>) -> Self {
        Self {
            library_document_id: Some(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipientSetMemberInfo {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientSetInfo {
    pub recipient_set_member_infos: Vec<RecipientSetMemberInfo>,
    pub recipient_set_role: RecipientRole,
}

/// Pre-filled value for a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeField {
    pub field_name: String,
    pub default_value: String,
}

/// Where the signer lands after completing the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetCompletionInfo {
    pub url: String,
    pub deframe: bool,
    pub delay: u32,
}

/// Body of `POST /widgets`, sent wrapped as `{"widgetCreationInfo": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCreationInfo {
    pub name: String,
    pub file_infos: Vec<FileInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub form_field_layer_templates: Vec<FileInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipient_set_infos: Vec<RecipientSetInfo>,
    pub signature_type: SignatureType,
    pub signature_flow: SignatureFlow,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub merge_field_info: Vec<MergeField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_completion_info: Option<WidgetCompletionInfo>,
}

impl WidgetCreationInfo {
    /// E-signature widget that the sender does not sign.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_infos: Vec::new(),
            form_field_layer_templates: Vec::new(),
            recipient_set_infos: Vec::new(),
            signature_type: SignatureType::Esign,
            signature_flow: SignatureFlow::SenderSignatureNotRequired,
            merge_field_info: Vec::new(),
            widget_completion_info: None,
        }
    }

    pub fn with_file(mut self, file: FileInfo) -> Self {
        self.file_infos.push(file);
        self
    }

    /// Apply the form fields of a library template on top of the documents.
    pub fn with_form_field_layer(mut self, template: FileInfo) -> Self {
        self.form_field_layer_templates.push(template);
        self
    }

    pub fn with_recipient(mut self, email: impl Into<String>, role: RecipientRole) -> Self {
        self.recipient_set_infos.push(RecipientSetInfo {
            recipient_set_member_infos: vec![RecipientSetMemberInfo {
                email: email.into(),
            }],
            recipient_set_role: role,
        });
        self
    }

    pub fn with_merge_field(
        mut self,
        field_name: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        self.merge_field_info.push(MergeField {
            field_name: field_name.into(),
            default_value: default_value.into(),
        });
        self
    }

    pub fn with_completion(mut self, completion: WidgetCompletionInfo) -> Self {
        self.widget_completion_info = Some(completion);
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetCreationRequest<'a> {
    widget_creation_info: &'a WidgetCreationInfo,
}

/// A created widget. Any field the provider omits is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Widget {
    #[serde(rename = "widgetId")]
    pub id: Option<String>,
    pub javascript: Option<String>,
    #[serde(rename = "nextPageEmbeddedCode")]
    pub embed_code: Option<String>,
    #[serde(rename = "nextPageUrl")]
    pub next_page_url: Option<String>,
    pub url: Option<String>,
}

impl SignClient {
    /// Create a signing widget.
    pub async fn create_widget(
        &self,
        token: &AccessToken,
        info: &WidgetCreationInfo,
    ) -> Result<Widget> {
        let request = WidgetCreationRequest {
            widget_creation_info: info,
        };
        let widget: Widget = self.post_json(token, "widgets", &request).await?;
        info!(widget_id = ?widget.id, name = %info.name, "created widget");
        Ok(widget)
    }
}
