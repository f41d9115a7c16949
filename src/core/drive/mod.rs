pub mod drive_service;
pub mod models;

pub use drive_service::{DriveClient, DriveService, CONTENT_UNAVAILABLE, MAX_SEARCH_RESULTS};
pub use models::{DriveError, DriveFile, DriveFileKind};
