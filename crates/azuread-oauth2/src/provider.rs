use crate::claims::VerifiedClaims;
use crate::config::TenantConfig;
use crate::error::{AuthError, AuthResult};
use crate::flow::{OAuthFlowClient, TokenBundle};
use crate::keys::KeyResolver;
use crate::verifier::TokenVerifier;
use serde::Serialize;
use std::sync::Arc;

/// Application user record extracted from a verified identity token.
/// `unique_id` and `email` are both populated from the `upn` claim.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub unique_id: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub first_name: String,
    pub last_name: String,
    /// The full verified claim set, for collaborators that map additional
    /// fields.
    pub raw_claims: VerifiedClaims,
}

impl AuthenticatedUser {
    /// Maps a verified claim set onto the user record. The user principal
    /// name is the unique identifier; a token without one cannot identify a
    /// user and is rejected.
    pub fn from_claims(claims: VerifiedClaims) -> AuthResult<Self> {
        let upn = claims
            .user_principal_name
            .clone()
            .ok_or_else(|| AuthError::MalformedToken("missing upn claim".to_string()))?;
        let fullname = claims.name.clone().unwrap_or_default();

        Ok(Self {
            unique_id: upn.clone(),
            username: fullname.clone(),
            email: upn,
            fullname,
            first_name: claims.given_name.clone().unwrap_or_default(),
            last_name: claims.family_name.clone().unwrap_or_default(),
            raw_claims: claims,
        })
    }
}

/// Top-level provider: owns the configuration and wires the flow client and
/// token verifier together for the hosting application.
#[derive(Debug, Clone)]
pub struct AzureAdProvider {
    config: Arc<TenantConfig>,
    flow: OAuthFlowClient,
    verifier: TokenVerifier,
}

impl AzureAdProvider {
    pub fn new(config: TenantConfig) -> Self {
        let config = Arc::new(config);
        Self {
            flow: OAuthFlowClient::new(config.clone()),
            verifier: TokenVerifier::new(KeyResolver::new()),
            config,
        }
    }

    /// Uses a caller-configured HTTP client for both the token exchanges
    /// and the key-set fetches.
    pub fn with_client(config: TenantConfig, http: reqwest::Client) -> Self {
        let config = Arc::new(config);
        Self {
            flow: OAuthFlowClient::with_client(config.clone(), http.clone()),
            verifier: TokenVerifier::new(KeyResolver::with_client(http)),
            config,
        }
    }

    pub fn config(&self) -> &TenantConfig {
        &self.config
    }

    pub fn flow(&self) -> &OAuthFlowClient {
        &self.flow
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Verifies the identity token of a freshly exchanged [`TokenBundle`]
    /// and extracts the authenticated user.
    ///
    /// The token's signature is checked against the tenant's published
    /// signing keys, its audience against the configured client id and its
    /// expiry against the current time. Any verification failure is an
    /// authentication failure for the whole attempt.
    pub async fn verify_identity_and_extract_user(
        &self,
        bundle: &TokenBundle,
    ) -> AuthResult<AuthenticatedUser> {
        let id_token = bundle
            .id_token
            .as_deref()
            .ok_or_else(|| AuthError::MalformedToken("token bundle has no id_token".to_string()))?;

        let claims = self
            .verifier
            .verify(id_token, &self.flow.key_set_url(), &self.config.client_id)
            .await?;

        AuthenticatedUser::from_claims(claims)
    }
}
