use super::models::{DriveError, DriveFile, DriveFileKind};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

/// Maximum number of documents requested from a single search.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Substitute content used when a single export fails. One bad file must
/// never abort the batch, so the synthesizer always receives something
/// non-empty for every document.
pub const CONTENT_UNAVAILABLE: &str = "Could not retrieve content for this file.";

/// Port implemented by the Drive infra adapter.
///
/// `search_files` returns descriptors without content, in whatever order the
/// remote ranking produced (no local re-ranking). `export_file` returns the
/// raw exported body for one document.
#[async_trait]
pub trait DriveClient: Send + Sync {
    async fn search_files(&self, query: &str) -> Result<Vec<DriveFile>, DriveError>;

    async fn export_file(&self, id: &str, kind: DriveFileKind) -> Result<String, DriveError>;
}

// Allows the orchestrator to share one client with the rest of the app.
#[async_trait]
impl<C: DriveClient> DriveClient for Arc<C> {
    async fn search_files(&self, query: &str) -> Result<Vec<DriveFile>, DriveError> {
        (**self).search_files(query).await
    }

    async fn export_file(&self, id: &str, kind: DriveFileKind) -> Result<String, DriveError> {
        (**self).export_file(id, kind).await
    }
}

/// Search and content-fetch policy on top of a `DriveClient`.
///
/// Search failures propagate (they abort the turn); per-file export failures
/// do not (they are absorbed into `CONTENT_UNAVAILABLE`).
pub struct DriveService<C: DriveClient> {
    client: C,
}

impl<C: DriveClient> DriveService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Full-text search over the user's Drive.
    pub async fn search(&self, query: &str) -> Result<Vec<DriveFile>, DriveError> {
        let files = self.client.search_files(query).await?;
        tracing::debug!(count = files.len(), "drive search completed");
        Ok(files)
    }

    /// Exports one document's content. Never fails: on any export error the
    /// sentinel string is returned instead.
    pub async fn fetch_content(&self, file: &DriveFile) -> String {
        match self.client.export_file(&file.id, file.kind).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(file_id = %file.id, error = %err, "content export failed");
                CONTENT_UNAVAILABLE.to_string()
            }
        }
    }

    /// Fetches content for every file concurrently, preserving order.
    ///
    /// All fetches settle before this returns; every file in the result has
    /// `content` populated (the sentinel for failed exports).
    pub async fn fetch_all(&self, files: Vec<DriveFile>) -> Vec<DriveFile> {
        let fetches = files.into_iter().map(|file| async move {
            let content = self.fetch_content(&file).await;
            DriveFile {
                content: Some(content),
                ..file
            }
        });
        join_all(fetches).await
    }
}
