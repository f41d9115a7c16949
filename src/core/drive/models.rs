use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the Drive search/export workflow.
///
/// Infra adapters map raw HTTP/JSON failures into these variants so the
/// orchestrator can react to the *kind* of failure without sniffing message
/// strings. `InvalidApiKey` is the one configuration error the UI reports
/// with its own text; everything else collapses into a generic turn failure.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("the configured Google API key was rejected")]
    InvalidApiKey,
    #[error("Drive search failed: {0}")]
    Search(String),
    #[error("Drive export failed: {0}")]
    Export(String),
    #[error("authentication error: {0}")]
    Auth(String),
}

/// The closed set of Google Workspace document types the assistant searches.
///
/// The search filter only ever asks for these three, so anything else coming
/// back from the API is dropped at the decode boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveFileKind {
    Document,
    Spreadsheet,
    Presentation,
}

impl DriveFileKind {
    pub const ALL: [DriveFileKind; 3] = [
        DriveFileKind::Document,
        DriveFileKind::Spreadsheet,
        DriveFileKind::Presentation,
    ];

    /// The Drive MIME type string for this kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DriveFileKind::Document => "application/vnd.google-apps.document",
            DriveFileKind::Spreadsheet => "application/vnd.google-apps.spreadsheet",
            DriveFileKind::Presentation => "application/vnd.google-apps.presentation",
        }
    }

    /// Parses a Drive MIME type string. Returns `None` for anything outside
    /// the recognized set.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.mime_type() == mime_type)
    }

    /// The MIME type content is exported as: spreadsheets become CSV,
    /// everything else plain text.
    pub fn export_mime_type(&self) -> &'static str {
        match self {
            DriveFileKind::Spreadsheet => "text/csv",
            _ => "text/plain",
        }
    }
}

/// A document found in the user's Drive.
///
/// `content` is absent until explicitly fetched for the current turn and is
/// never persisted beyond the in-memory transcript. `web_view_link` is for
/// display only; the assistant never dereferences it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub kind: DriveFileKind,
    pub web_view_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl DriveFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: DriveFileKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            web_view_link: String::new(),
            content: None,
        }
    }

    pub fn with_web_view_link(mut self, link: impl Into<String>) -> Self {
        self.web_view_link = link.into();
        self
    }
}
