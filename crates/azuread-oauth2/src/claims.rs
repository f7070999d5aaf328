use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim set of a verified identity token.
///
/// Produced only after signature, expiry and audience validation succeeded.
/// The named fields cover the claims this crate acts on; everything else the
/// provider put in the payload is preserved untouched in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifiedClaims {
    /// Audience - the client id the token was issued to (JWT: aud).
    #[serde(rename = "aud", skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Expiration Time - Unix timestamp when the token expires (JWT: exp).
    #[serde(rename = "exp")]
    pub expiration: i64,

    /// Not Before - Unix timestamp when the token becomes valid (JWT: nbf).
    #[serde(rename = "nbf", skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,

    /// Issued At - Unix timestamp when the token was issued (JWT: iat).
    #[serde(rename = "iat", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    /// Issuer - the tenant-scoped endpoint that issued the token (JWT: iss).
    #[serde(rename = "iss", skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Subject - opaque per-user identifier (JWT: sub).
    #[serde(rename = "sub", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// User Principal Name - the user's login, e.g. user@domain.
    #[serde(rename = "upn", skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,

    /// User's display name.
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// User's first name.
    #[serde(rename = "given_name", skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// User's last name.
    #[serde(rename = "family_name", skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Every other claim in the payload, unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
