use crate::claims::VerifiedClaims;
use crate::error::{AuthError, AuthResult};
use crate::keys::KeyResolver;
use jsonwebtoken::{decode, decode_header, Algorithm, Header, Validation};
use url::Url;

/// Decodes a compact identity token's header without verification.
/// Malformed structure is a hard failure; no partial trust is granted.
pub fn decode_token_header(token: &str) -> AuthResult<Header> {
    decode_header(token).map_err(|err| AuthError::MalformedToken(err.to_string()))
}

/// Verifies identity tokens against keys published at the tenant's key-set
/// endpoint.
///
/// Stateless per call: the signing key is resolved fresh for every
/// verification, so instances can be shared freely across tasks.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    resolver: KeyResolver,
}

impl TokenVerifier {
    pub fn new(resolver: KeyResolver) -> Self {
        Self { resolver }
    }

    /// Fully verifies `id_token`: signature against the key the header's
    /// `kid` resolves to, `exp` in the future, and `aud` equal to
    /// `audience` (exact string equality).
    ///
    /// Any failure is terminal for this call. There is no fallback key, no
    /// retry and no algorithm downgrade; only RSA signatures backed by the
    /// provider's certificate material are accepted.
    pub async fn verify(
        &self,
        id_token: &str,
        key_set_endpoint: &Url,
        audience: &str,
    ) -> AuthResult<VerifiedClaims> {
        let header = decode_token_header(id_token)?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::MalformedToken("missing kid in token header".to_string()))?;

        if !matches!(
            header.alg,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512
        ) {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let decoding_key = self.resolver.resolve(key_set_endpoint, &kid).await?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "aud"]);

        let token_data = decode::<VerifiedClaims>(id_token.to_string(), &decoding_key, &validation)
            .map_err(|err| {
                use jsonwebtoken::errors::ErrorKind;
                match err.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidAudience => AuthError::AudienceMismatch {
                        expected: audience.to_string(),
                    },
                    ErrorKind::InvalidToken | ErrorKind::MissingRequiredClaim(_) => {
                        AuthError::MalformedToken(err.to_string())
                    }
                    _ => AuthError::SignatureInvalid(err.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
