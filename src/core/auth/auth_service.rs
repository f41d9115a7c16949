use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors from client bootstrap and token acquisition.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("client bootstrap failed: {0}")]
    Bootstrap(String),
    #[error("invalid service account credentials: {0}")]
    Credentials(String),
    #[error("token request failed: {0}")]
    TokenRequest(String),
    #[error("client library is not initialized")]
    NotReady,
}

/// Port for the credential/session provider.
///
/// `initialize` performs the one-time client bootstrap and must be
/// memoized: repeated or concurrent calls share the same pending-or-resolved
/// outcome. `connect` acquires an access token — interactively (consent) when
/// none is held, silently when one is. Token lifetime and refresh stay the
/// identity provider's responsibility.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    async fn initialize(&self) -> Result<(), AuthError>;

    async fn connect(&self) -> Result<(), AuthError>;
}

#[async_trait]
impl<A: SessionAuthenticator> SessionAuthenticator for Arc<A> {
    async fn initialize(&self) -> Result<(), AuthError> {
        (**self).initialize().await
    }

    async fn connect(&self) -> Result<(), AuthError> {
        (**self).connect().await
    }
}
