//! Adobe Sign REST API v5 client
//!
//! Thin async wrappers over the calls needed to embed a signing form:
//!
//! 1. `SignClient::authorization_url()` sends the user to Adobe Sign
//! 2. `SignClient::exchange_code()` turns the redirect's code into an access token
//! 3. `SignClient::upload_transient_document()` uploads the PDF to sign
//! 4. `SignClient::library_documents()` + `find_library_document_by_name()`
//!    locate a form-field template
//! 5. `SignClient::create_widget()` builds the embeddable signing widget
//!
//! Failures are returned as `Error` values; nothing is retried.

pub mod client;
pub mod constants;
pub mod credentials;
pub mod documents;
pub mod error;
pub mod oauth;
pub mod widgets;

#[cfg(test)]
mod test_support;

pub use client::SignClient;
pub use constants::*;
pub use credentials::{AccessToken, ClientCredentials};
pub use documents::{LibraryDocument, find_library_document_by_name};
pub use error::{Error, Result};
pub use widgets::{
    FileInfo, MergeField, RecipientRole, RecipientSetInfo, RecipientSetMemberInfo, SignatureFlow,
    SignatureType, Widget, WidgetCompletionInfo, WidgetCreationInfo,
};
