#![allow(dead_code)]

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// RSA key the mock provider signs identity tokens with.
pub const SIGNING_KEY_PEM: &str = include_str!("../fixtures/signing_key.pem");
/// A second RSA key with no certificate in the key-set (forged-token tests).
pub const UNTRUSTED_KEY_PEM: &str = include_str!("../fixtures/untrusted_key.pem");
/// Self-signed certificate of `SIGNING_KEY_PEM`, base64 DER as served in `x5c`.
pub const SIGNING_CERT_B64: &str = include_str!("../fixtures/signing_cert_der.b64");

pub const TEST_KID: &str = "test-signing-key";
pub const CLIENT_ID: &str = "11111111-2222-3333-4444-555555555555";

pub fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Key-set document with the fixture certificate under `TEST_KID`.
pub fn key_set_json() -> Value {
    json!({
        "keys": [
            {
                "kid": TEST_KID,
                "kty": "RSA",
                "use": "sig",
                "x5c": [SIGNING_CERT_B64.trim()]
            }
        ]
    })
}

/// Identity-token claims accepted by the verifier defaults; `exp_offset` is
/// relative to now (use a value past the verifier's leeway for expiry tests).
pub fn default_claims(audience: &str, exp_offset: i64) -> Value {
    json!({
        "aud": audience,
        "exp": now_epoch() + exp_offset,
        "upn": "ada@contoso.test",
        "name": "Ada Lovelace",
        "given_name": "Ada",
        "family_name": "Lovelace"
    })
}

/// Signs `claims` as an RS256 compact token with the given `kid`.
pub fn sign_token(key_pem: &str, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    encode(
        &header,
        claims,
        &EncodingKey::from_rsa_pem(key_pem.as_bytes()).expect("fixture key parses"),
    )
    .expect("token signs")
}

/// Signs `claims` as an HS256 token, for algorithm-confusion tests.
pub fn sign_hmac_token(kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &EncodingKey::from_secret(b"shared-secret")).expect("token signs")
}

/// Serves `document` from `/{tenant}/discovery/keys` on the mock server.
pub async fn mount_key_set(server: &MockServer, tenant: &str, document: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{tenant}/discovery/keys")))
        .respond_with(ResponseTemplate::new(200).set_body_json(document))
        .mount(server)
        .await;
}
