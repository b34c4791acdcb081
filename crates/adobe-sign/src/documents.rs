//! Transient and library documents

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{SignClient, join_url, require_token};
use crate::constants::{ACCESS_TOKEN_HEADER, PDF_MIME_TYPE};
use crate::credentials::AccessToken;
use crate::error::{Error, Result};

/// One entry of the account's document library.
///
/// Only `id` and `name` are interpreted, and either may be absent or null.
/// Everything else the provider sends is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(rename = "libraryDocumentId", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransientDocumentResponse {
    transient_document_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibraryDocumentsResponse {
    library_document_list: Option<Vec<LibraryDocument>>,
}

impl SignClient {
    /// Upload a PDF as a transient document and return its id.
    ///
    /// The file is read before any request is made, so a bad path fails with
    /// `Error::Io` and no network traffic. The file handle is closed before
    /// the upload starts.
    pub async fn upload_transient_document(
        &self,
        token: &AccessToken,
        file_path: impl AsRef<Path>,
    ) -> Result<String> {
        require_token(token)?;
        let file_path = file_path.as_ref();

        let contents = tokio::fs::read(file_path)
            .await
            .map_err(|e| Error::Io(format!("reading {}: {e}", file_path.display())))?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let file_part = Part::bytes(contents)
            .file_name(file_name)
            .mime_str(PDF_MIME_TYPE)
            .map_err(|e| Error::Http(format!("building upload part: {e}")))?;

        // Adobe Sign v5 expects three parts in this order
        let form = Form::new()
            .text("File-Name", "")
            .text("Mime-Type", PDF_MIME_TYPE)
            .part("File", file_part);

        let url = join_url(&self.api_base_url(token).await?, "transientDocuments");
        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, token.expose())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Http(format!("transient document upload failed: {e}")))?;

        let body: TransientDocumentResponse =
            self.read_json("transientDocuments", response).await?;
        let id = body
            .transient_document_id
            .ok_or(Error::MissingField("transientDocumentId"))?;

        info!(path = %file_path.display(), "uploaded transient document");
        Ok(id)
    }

    /// List the documents in the account library.
    ///
    /// An empty library is `Ok(vec![])`, never an error.
    pub async fn library_documents(&self, token: &AccessToken) -> Result<Vec<LibraryDocument>> {
        let body: LibraryDocumentsResponse = self.get_json(token, "libraryDocuments").await?;
        body.library_document_list
            .ok_or(Error::MissingField("libraryDocumentList"))
    }
}

/// Id of the first library document whose name equals `name`.
pub fn find_library_document_by_name<'a>(
    documents: &'a [LibraryDocument],
    name: &str,
) -> Option<&'a str> {
    documents
        .iter()
        .find(|doc| doc.name.as_deref() == Some(name))
        .and_then(|doc| doc.id.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mock_client, mount_discovery};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn doc(id: &str, name: &str) -> LibraryDocument {
        LibraryDocument {
            id: Some(id.into()),
            name: Some(name.into()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn find_in_empty_collection_is_none() {
        assert_eq!(find_library_document_by_name(&[], "Contract"), None);
    }

    #[test]
    fn find_without_match_is_none() {
        let docs = vec![doc("L1", "NDA"), doc("L2", "Invoice")];
        assert_eq!(find_library_document_by_name(&docs, "Contract"), None);
    }

    #[test]
    fn find_returns_sole_match() {
        let docs = vec![doc("L1", "NDA"), doc("L2", "Contract")];
        assert_eq!(find_library_document_by_name(&docs, "Contract"), Some("L2"));
    }

    #[test]
    fn find_prefers_first_of_duplicate_names() {
        let docs = vec![doc("L1", "Contract"), doc("L2", "Contract")];
        assert_eq!(find_library_document_by_name(&docs, "Contract"), Some("L1"));
    }

    #[test]
    fn library_document_keeps_provider_fields() {
        let json = r#"{
            "libraryDocumentId": "3AAABLblqZhA",
            "name": "Form Fields Template",
            "libraryTemplateTypes": ["DOCUMENT", "FORM_FIELD_LAYER"],
            "modifiedDate": "2016-08-01T10:00:00-07:00"
        }"#;
        let doc: LibraryDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id.as_deref(), Some("3AAABLblqZhA"));
        assert_eq!(doc.name.as_deref(), Some("Form Fields Template"));
        assert_eq!(doc.extra["libraryTemplateTypes"][1], "FORM_FIELD_LAYER");
        assert!(!doc.extra.contains_key("libraryDocumentId"));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["libraryDocumentId"], "3AAABLblqZhA");
        assert_eq!(back["modifiedDate"], "2016-08-01T10:00:00-07:00");
    }

    #[tokio::test]
    async fn lists_library_documents() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/rest/v5/libraryDocuments"))
            .and(header(ACCESS_TOKEN_HEADER, "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "libraryDocumentList": [
                    {"libraryDocumentId": "L1", "name": "NDA", "scope": "PERSONAL"},
                    {"libraryDocumentId": "L2", "name": "Contract", "scope": "SHARED"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let docs = client
            .library_documents(&AccessToken::new("tok"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].name.as_deref(), Some("Contract"));
        assert_eq!(docs[1].extra["scope"], "SHARED");
        assert_eq!(find_library_document_by_name(&docs, "NDA"), Some("L1"));
    }

    #[tokio::test]
    async fn irregular_entries_do_not_fail_the_listing() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/rest/v5/libraryDocuments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "libraryDocumentList": [
                    {"libraryDocumentId": "L1", "name": null},
                    {"libraryDocumentId": "L2", "id": "X", "name": "Contract"},
                    {"scope": "SHARED"}
                ]
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let docs = client
            .library_documents(&AccessToken::new("tok"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id.as_deref(), Some("L1"));
        assert_eq!(docs[0].name, None);
        assert_eq!(docs[1].id.as_deref(), Some("L2"));
        assert_eq!(docs[1].extra["id"], "X");
        assert_eq!(docs[2].id, None);
        assert_eq!(find_library_document_by_name(&docs, "Contract"), Some("L2"));
    }

    #[test]
    fn find_skips_entries_without_name() {
        let mut unnamed = doc("L1", "");
        unnamed.name = None;
        let docs = vec![unnamed, doc("L2", "Contract")];
        assert_eq!(find_library_document_by_name(&docs, ""), None);
        assert_eq!(find_library_document_by_name(&docs, "Contract"), Some("L2"));
    }

    #[tokio::test]
    async fn empty_library_is_ok_and_empty() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/rest/v5/libraryDocuments"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"libraryDocumentList": []})),
            )
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let docs = client
            .library_documents(&AccessToken::new("tok"))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn library_listing_failure_is_an_error() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/rest/v5/libraryDocuments"))
            .respond_with(ResponseTemplate::new(403).set_body_string("PERMISSION_DENIED"))
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client
            .library_documents(&AccessToken::new("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth { status: 403, .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn uploads_three_part_multipart() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/rest/v5/transientDocuments"))
            .and(header(ACCESS_TOKEN_HEADER, "tok"))
            .and(body_string_contains("name=\"File-Name\""))
            .and(body_string_contains("name=\"Mime-Type\""))
            .and(body_string_contains("application/pdf"))
            .and(body_string_contains("name=\"File\"; filename=\"contract.pdf\""))
            .and(body_string_contains("%PDF-1.4 test body"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"transientDocumentId": "T1"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("contract.pdf");
        std::fs::write(&pdf, "%PDF-1.4 test body").unwrap();

        let client = mock_client(&server);
        let id = client
            .upload_transient_document(&AccessToken::new("tok"), &pdf)
            .await
            .unwrap();
        assert_eq!(id, "T1");
    }

    #[tokio::test]
    async fn upload_of_missing_file_is_io_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = mock_client(&server);
        let err = client
            .upload_transient_document(&AccessToken::new("tok"), "/nonexistent/contract.pdf")
            .await
            .unwrap_err();
        match err {
            Error::Io(msg) => assert!(msg.contains("/nonexistent/contract.pdf"), "got: {msg}"),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_requires_token() {
        let server = MockServer::start().await;
        let client = mock_client(&server);
        let err = client
            .upload_transient_document(&AccessToken::new(""), "/tmp/whatever.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingInput("access token")));
    }

    #[tokio::test]
    async fn upload_without_document_id_errors() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/rest/v5/transientDocuments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("a.pdf");
        std::fs::write(&pdf, "%PDF").unwrap();

        let client = mock_client(&server);
        let err = client
            .upload_transient_document(&AccessToken::new("tok"), &pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingField("transientDocumentId")));
    }
}
