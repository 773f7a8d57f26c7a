pub mod guard;
pub mod session;

mod gotrue;

pub use gotrue::GoTrueClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth provider answered {status}")]
    UnexpectedStatus { status: reqwest::StatusCode },
}

/// Token pair issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Hosted authentication service.
///
/// `Ok(None)` means the provider rejected the token or credentials; `Err`
/// is reserved for transport failures and unexpected answers.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<Option<SessionTokens>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str)
    -> Result<Option<SessionTokens>, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
