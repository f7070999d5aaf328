//! OAuth2 authorization-code and refresh-token client for tenant-scoped
//! Azure AD endpoints, with verification of the returned identity token
//! against the tenant's published signing keys.
//!
//! The flow: [`OAuthFlowClient`] exchanges an authorization code for a
//! [`TokenBundle`]; [`TokenVerifier`] validates the bundle's identity token
//! (signature, expiry, audience) using a key resolved by [`KeyResolver`]
//! from the tenant's key-set endpoint; [`AzureAdProvider`] composes both
//! and maps verified claims to an [`AuthenticatedUser`]. Independently,
//! [`TokenLifecycleManager`] keeps stored access tokens fresh by triggering
//! refresh-token exchanges once their recorded expiry has passed.
//!
//! All components are stateless per call and safe to share across tasks;
//! key-set documents are fetched fresh for every verification.

mod claims;
mod config;
mod error;
mod flow;
mod keys;
mod lifecycle;
mod provider;
mod verifier;

pub use claims::VerifiedClaims;
pub use config::{TenantConfig, COMMON_TENANT, DEFAULT_AUTHORITY, DEFAULT_SCOPES};
pub use error::{AuthError, AuthResult};
pub use flow::{OAuthFlowClient, TokenBundle};
pub use keys::{KeyResolver, KeySetDocument, SigningKeyEntry};
pub use lifecycle::{StoredToken, TokenLifecycleManager, TokenStore};
pub use provider::{AuthenticatedUser, AzureAdProvider};
pub use verifier::{decode_token_header, TokenVerifier};
