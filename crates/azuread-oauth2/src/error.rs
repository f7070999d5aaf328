use thiserror::Error;

pub type AuthResult<T> = core::result::Result<T, AuthError>;

/// Failures raised by the authentication flow and by identity-token
/// verification.
///
/// Verification failures are terminal for the current authentication
/// attempt: there is no fallback key, no retry and no algorithm downgrade.
/// Transport failures ([`AuthError::KeyFetch`], [`AuthError::TokenExchange`]
/// with no status) can be retried by the caller at a higher level.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The key-set endpoint was unreachable or returned a non-success status.
    #[error("failed to retrieve signing keys from {url}: {reason}")]
    KeyFetch { url: String, reason: String },

    /// No key in the key-set document matches the token's declared key id.
    /// May indicate a key rotation in progress; the caller may retry against
    /// a fresh fetch, this crate does not.
    #[error("no signing key found for kid {kid:?}")]
    KeyNotFound { kid: String },

    /// The matched key entry carries no usable certificate, or the
    /// certificate is not valid base64/DER, or its public key is not RSA.
    #[error("unusable key material for kid {kid:?}: {reason}")]
    InvalidKeyMaterial { kid: String, reason: String },

    /// The token is not a well-formed compact JWT, or its header is missing
    /// a required field.
    #[error("malformed identity token: {0}")]
    MalformedToken(String),

    /// The token header declares an algorithm outside the RSA family.
    /// Unsigned ("none") and symmetric algorithms are rejected outright,
    /// since the provider's key material is certificate-backed RSA.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The signature does not validate against the resolved public key.
    #[error("identity token signature is invalid: {0}")]
    SignatureInvalid(String),

    /// The `exp` claim is in the past.
    #[error("identity token has expired")]
    TokenExpired,

    /// The `aud` claim does not equal the configured client id.
    #[error("identity token audience does not match client id {expected:?}")]
    AudienceMismatch { expected: String },

    /// The token endpoint rejected a code exchange or refresh request.
    #[error("token endpoint request failed: {reason}")]
    TokenExchange { status: Option<u16>, reason: String },

    /// No persisted token record exists for the requested user.
    #[error("no stored token for user {user_id:?}")]
    StoredTokenMissing { user_id: String },
}

impl AuthError {
    /// Whether this failure happened at the transport level, before any
    /// verification took place. Transport failures are safe to retry;
    /// everything else is a security-relevant rejection of the token.
    pub fn is_transport(&self) -> bool {
        match self {
            AuthError::KeyFetch { .. } => true,
            AuthError::TokenExchange { status, .. } => status.is_none(),
            _ => false,
        }
    }
}
