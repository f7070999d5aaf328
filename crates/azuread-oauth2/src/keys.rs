use crate::error::{AuthError, AuthResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use url::Url;
use x509_parser::oid_registry::OID_PKCS1_RSAENCRYPTION;
use x509_parser::parse_x509_certificate;

/// The provider's published key-set document: a `keys` array where each
/// entry carries a key id and a certificate chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySetDocument {
    /// List of signing keys, in the order the provider published them.
    pub keys: Vec<SigningKeyEntry>,
}

/// One signing key of the key-set document. Only the fields this crate acts
/// on are modeled; unknown fields are ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningKeyEntry {
    /// Key identifier matched against the `kid` of a token header.
    pub kid: String,

    /// Certificate chain as base64-encoded DER certificates. The first
    /// entry is the leaf certificate used for token verification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub x5c: Vec<String>,

    /// Key type, e.g. "RSA".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,

    /// Intended key use, e.g. "sig".
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
}

impl KeySetDocument {
    /// Returns the entry whose key id exactly equals `kid`.
    pub fn find(&self, kid: &str) -> Option<&SigningKeyEntry> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

impl SigningKeyEntry {
    /// Extracts the RSA public key of the leaf certificate as a
    /// [`DecodingKey`] usable for signature verification.
    ///
    /// The first `x5c` entry is decoded from base64, parsed as a DER X.509
    /// certificate and its subject public key extracted. The chain is not
    /// validated against a trusted root: the key-set endpoint's transport
    /// security is the trust anchor (leaf-only trust, matching the
    /// provider's key rotation model).
    pub fn decoding_key(&self) -> AuthResult<DecodingKey> {
        let leaf = self
            .x5c
            .first()
            .ok_or_else(|| AuthError::InvalidKeyMaterial {
                kid: self.kid.clone(),
                reason: "entry has no certificate chain".to_string(),
            })?;

        let der = STANDARD
            .decode(leaf)
            .map_err(|err| AuthError::InvalidKeyMaterial {
                kid: self.kid.clone(),
                reason: format!("certificate is not valid base64: {err}"),
            })?;

        let (_, certificate) =
            parse_x509_certificate(&der).map_err(|err| AuthError::InvalidKeyMaterial {
                kid: self.kid.clone(),
                reason: format!("invalid DER certificate: {err}"),
            })?;

        let spki = certificate.public_key();
        if spki.algorithm.algorithm != OID_PKCS1_RSAENCRYPTION {
            return Err(AuthError::InvalidKeyMaterial {
                kid: self.kid.clone(),
                reason: format!(
                    "certificate public key is not RSA (algorithm {})",
                    spki.algorithm.algorithm
                ),
            });
        }

        Ok(DecodingKey::from_rsa_der(&spki.subject_public_key.data))
    }
}

/// Fetches the provider's key-set document and resolves signing keys by key
/// identifier. Stateless: every resolution re-fetches the document, so
/// concurrent verifications need no coordination.
#[derive(Debug, Clone, Default)]
pub struct KeyResolver {
    http: reqwest::Client,
}

impl KeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a caller-configured HTTP client (proxies, timeouts, etc.).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetches the key-set document from `key_set_endpoint`.
    /// A non-success HTTP status is a hard failure, propagated without retry.
    pub async fn fetch_key_set(&self, key_set_endpoint: &Url) -> AuthResult<KeySetDocument> {
        tracing::debug!(url = %key_set_endpoint, "fetching key-set document");
        let response = self
            .http
            .get(key_set_endpoint.clone())
            .send()
            .await
            .map_err(|err| AuthError::KeyFetch {
                url: key_set_endpoint.to_string(),
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyFetch {
                url: key_set_endpoint.to_string(),
                reason: format!("unexpected status {status}"),
            });
        }

        response
            .json::<KeySetDocument>()
            .await
            .map_err(|err| AuthError::KeyFetch {
                url: key_set_endpoint.to_string(),
                reason: format!("invalid key-set document: {err}"),
            })
    }

    /// Resolves the public key for `kid` from the document published at
    /// `key_set_endpoint`. Fails with [`AuthError::KeyNotFound`] when no
    /// entry matches.
    pub async fn resolve(&self, key_set_endpoint: &Url, kid: &str) -> AuthResult<DecodingKey> {
        let key_set = self.fetch_key_set(key_set_endpoint).await?;
        let entry = key_set.find(kid).ok_or_else(|| AuthError::KeyNotFound {
            kid: kid.to_string(),
        })?;
        entry.decoding_key()
    }
}
