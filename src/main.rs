// This is the entry point of the Drive chat assistant.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): transcript, orchestrator,
//   search/fetch/synthesis policy, and the ports infra implements
// - `infra/` = Implementations of core traits (Drive REST, OAuth2, Gemini)
// - `console/` = Terminal surface (rendering and input only)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Hand the wired-up chat service to the console loop

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a handful of mod.rs files that all look the same.
#[path = "console/console_layer.rs"]
mod console;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::ai::{AiConfig, AnswerService};
use crate::core::chat::ChatService;
use crate::core::drive::DriveService;
use crate::infra::ai::GeminiClient;
use crate::infra::google::{GoogleAuth, GoogleDriveClient};
use anyhow::Context;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let google_api_key = std::env::var("GOOGLE_API_KEY").context(
        "Missing GOOGLE_API_KEY environment variable! Create a .env file with your Drive API key.",
    )?;

    // One key can serve both Drive and Gemini, so a dedicated Gemini key is
    // optional.
    let gemini_api_key =
        std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| google_api_key.clone());

    let ai_config = AiConfig {
        model: std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| crate::core::ai::DEFAULT_MODEL.to_string()),
        ..AiConfig::default()
    };

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let auth = Arc::new(
        GoogleAuth::from_env(google_api_key.clone())
            .await
            .context("Failed to load Google service account credentials")?,
    );

    let drive = DriveService::new(Arc::new(GoogleDriveClient::new(
        google_api_key,
        auth.clone(),
    )));
    let answers = AnswerService::new(GeminiClient::new(gemini_api_key), ai_config);

    let mut chat = ChatService::new(auth, drive, answers);

    console::run(&mut chat).await
}
