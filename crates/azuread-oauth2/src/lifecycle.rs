use crate::error::{AuthError, AuthResult};
use crate::flow::OAuthFlowClient;
use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};

/// Persisted token record for one user, as written by the hosting
/// application after a successful code exchange.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry of the access token, epoch seconds.
    pub expires_on: i64,
}

/// Read access to the hosting application's token storage. Persistence of
/// refreshed bundles stays with the collaborator implementing this trait.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn stored_token(&self, user_id: &str) -> AuthResult<Option<StoredToken>>;
}

/// Decides, per access-token request, whether a stored token can be reused
/// or must be refreshed through the token endpoint.
///
/// Two states, keyed off the recorded `expires_on`: while it lies in the
/// future the stored token is returned unchanged; once it has passed, a
/// refresh-token exchange is performed and the fresh access token returned.
/// The check runs on every call; there is no terminal state.
pub struct TokenLifecycleManager<S> {
    flow: OAuthFlowClient,
    store: S,
}

impl<S: TokenStore> TokenLifecycleManager<S> {
    pub fn new(flow: OAuthFlowClient, store: S) -> Self {
        Self { flow, store }
    }

    /// Returns a non-expired access token for `user_id`, refreshing it
    /// first when the stored one has expired. The refreshed bundle is not
    /// written back to storage here; that remains the caller's job.
    pub async fn get_valid_access_token(&self, user_id: &str) -> AuthResult<String> {
        let stored = self
            .store
            .stored_token(user_id)
            .await?
            .ok_or_else(|| AuthError::StoredTokenMissing {
                user_id: user_id.to_string(),
            })?;

        if stored.expires_on > now_epoch() {
            return Ok(stored.access_token);
        }

        tracing::debug!(user_id, "stored access token expired, refreshing");
        let refreshed = self.flow.refresh_access_token(&stored.refresh_token).await?;
        Ok(refreshed.access_token)
    }
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
