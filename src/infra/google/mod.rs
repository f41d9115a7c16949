pub mod auth;
pub mod drive_client;

pub use auth::{GoogleAuth, DRIVE_SCOPE};
pub use drive_client::GoogleDriveClient;
