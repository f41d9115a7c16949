// Console layer - the interactive terminal surface.
//
// Rendering and input collection only; every decision about what a turn does
// lives in the core orchestrator. The connect screen, transcript rendering,
// and loading indicator mirror the states exposed by `SessionState`.

use crate::core::ai::CompletionProvider;
use crate::core::auth::SessionAuthenticator;
use crate::core::chat::{ChatMessage, ChatService, Role};
use crate::core::drive::DriveClient;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Icon for a source entry, resolved purely from the MIME type string.
/// Total: anything unrecognized falls back to the document icon.
pub fn icon_for(mime_type: &str) -> &'static str {
    match mime_type {
        "application/vnd.google-apps.document" => "📄",
        "application/vnd.google-apps.spreadsheet" => "📊",
        "application/vnd.google-apps.presentation" => "📽",
        _ => "📄",
    }
}

fn render_message(message: &ChatMessage) {
    let speaker = match message.role {
        Role::User => "You",
        Role::Model => "Assistant",
    };
    println!(
        "[{}] {}: {}",
        message.created_at.format("%H:%M"),
        speaker,
        message.text
    );

    if !message.sources.is_empty() {
        println!("  Sources:");
        for source in &message.sources {
            println!(
                "    {} {} — {}",
                icon_for(source.kind.mime_type()),
                source.name,
                source.web_view_link
            );
        }
    }
}

fn prompt_for_input() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Runs the chat session: bootstrap, connect screen, then the message loop.
pub async fn run<A, C, P>(chat: &mut ChatService<A, C, P>) -> anyhow::Result<()>
where
    A: SessionAuthenticator,
    C: DriveClient,
    P: CompletionProvider,
{
    println!("Drive Chat Assistant");
    println!("Ask questions and get answers grounded in your Google Drive documents.");
    println!();

    if let Err(err) = chat.initialize().await {
        tracing::error!(error = %err, "failed to initialize the Google client");
        println!("Could not initialize the Google Drive client. Check GOOGLE_API_KEY and your network, then restart.");
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Connect screen: shown until a token grant succeeds.
    while !chat.session().connected {
        println!("Connect to Google Drive to get started. Press Enter to connect, or type 'quit'.");
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        if line.trim().eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        match chat.connect().await {
            Ok(()) => {
                for message in chat.transcript().messages() {
                    render_message(message);
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "authentication failed");
            }
        }
    }

    loop {
        prompt_for_input();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim().to_string();
        if input.eq_ignore_ascii_case("quit") {
            break;
        }

        let seen = chat.transcript().len();
        if !input.is_empty() {
            println!("Searching your Drive...");
        }

        chat.submit(&input).await;

        for message in &chat.transcript().messages()[seen..] {
            if message.role == Role::User {
                continue;
            }
            render_message(message);
        }
    }

    Ok(())
}
