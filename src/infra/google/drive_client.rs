// =============================================================================
// GOOGLE DRIVE REST CLIENT
// =============================================================================
//
// Implements the `DriveClient` port against the Drive v3 REST API:
// - `files.list` with a server-side full-text filter for document search
// - `files.export` for per-file plain-text/CSV content
//
// Requests carry both the API key (query parameter, as the JS client library
// does) and the OAuth bearer token from the session provider.

use super::auth::GoogleAuth;
use crate::core::drive::{DriveClient, DriveError, DriveFile, DriveFileKind, MAX_SEARCH_RESULTS};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// The fields requested from `files.list`; everything else is dead weight.
const SEARCH_FIELDS: &str = "files(id, name, mimeType, webViewLink)";

/// Marker Google embeds in the error payload when the API key is rejected.
const API_KEY_INVALID_MARKER: &str = "API key not valid";

/// One file resource from a `files.list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    id: String,
    name: String,
    mime_type: String,
    web_view_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileResource>,
}

#[derive(Debug, Deserialize)]
struct DriveApiErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct DriveApiErrorResponse {
    error: DriveApiErrorDetail,
}

/// Builds the `files.list` query filter: full-text match restricted to the
/// recognized document types. Single quotes in the query are escaped so user
/// input cannot break out of the filter string.
fn build_search_query(query: &str) -> String {
    let escaped = query.replace('\'', "\\'");
    let kinds = DriveFileKind::ALL
        .iter()
        .map(|kind| format!("mimeType='{}'", kind.mime_type()))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("fullText contains '{escaped}' and ({kinds})")
}

/// Decodes one search result. Types outside the recognized set cannot occur
/// given the filter, but the decode stays total and just drops them.
fn into_drive_file(resource: FileResource) -> Option<DriveFile> {
    let kind = DriveFileKind::from_mime_type(&resource.mime_type)?;
    Some(DriveFile {
        id: resource.id,
        name: resource.name,
        kind,
        web_view_link: resource.web_view_link.unwrap_or_default(),
        content: None,
    })
}

/// Maps a non-success `files.list` response to the error taxonomy: a
/// rejected API key gets its own variant, everything else is a generic
/// search failure.
fn classify_search_error(status: reqwest::StatusCode, body: &str) -> DriveError {
    let message = serde_json::from_str::<DriveApiErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    if message.contains(API_KEY_INVALID_MARKER) {
        DriveError::InvalidApiKey
    } else {
        DriveError::Search(format!("files.list returned {}: {}", status, message))
    }
}

/// Drive v3 client. Cheap to share behind the `Arc` blanket impl on the port.
pub struct GoogleDriveClient {
    http: Client,
    api_key: String,
    auth: Arc<GoogleAuth>,
}

impl GoogleDriveClient {
    pub fn new(api_key: impl Into<String>, auth: Arc<GoogleAuth>) -> Self {
        Self {
            http: crate::infra::http_client(),
            api_key: api_key.into(),
            auth,
        }
    }

    async fn bearer_token(&self) -> Result<String, DriveError> {
        self.auth
            .access_token()
            .await
            .map_err(|err| DriveError::Auth(err.to_string()))
    }
}

#[async_trait]
impl DriveClient for GoogleDriveClient {
    async fn search_files(&self, query: &str) -> Result<Vec<DriveFile>, DriveError> {
        let token = self.bearer_token().await?;
        let page_size = MAX_SEARCH_RESULTS.to_string();

        tracing::debug!(query, "searching Drive");

        let response = self
            .http
            .get(FILES_URL)
            .bearer_auth(&token)
            .query(&[
                ("q", build_search_query(query).as_str()),
                ("fields", SEARCH_FIELDS),
                ("pageSize", page_size.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|err| DriveError::Search(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_search_error(status, &body));
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|err| DriveError::Search(err.to_string()))?;

        Ok(list.files.into_iter().filter_map(into_drive_file).collect())
    }

    async fn export_file(&self, id: &str, kind: DriveFileKind) -> Result<String, DriveError> {
        let token = self.bearer_token().await?;
        let url = format!("{}/{}/export", FILES_URL, id);

        tracing::debug!(file_id = id, export_mime = kind.export_mime_type(), "exporting file");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("mimeType", kind.export_mime_type()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|err| DriveError::Export(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Export(format!(
                "files.export returned {}: {}",
                status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|err| DriveError::Export(err.to_string()))
    }
}
