use crate::config::{TenantConfig, DEFAULT_SCOPES};
use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Token endpoint response for both the authorization-code exchange and the
/// refresh-token exchange.
///
/// The v1 token endpoint returns the numeric fields as decimal strings;
/// deserialization accepts both representations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Signed identity token; present on the code exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token lifetime in seconds.
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    /// Absolute expiry of the access token, epoch seconds.
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<i64>,

    /// Epoch seconds before which the access token is not valid.
    #[serde(default, deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,
}

/// Accepts an integer either as a JSON number or as a decimal string.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::String(value)) => value
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Client for the tenant-scoped OAuth2 endpoints: builds endpoint URLs from
/// the configured tenant id and performs the authorization-code and
/// refresh-token exchanges.
#[derive(Debug, Clone)]
pub struct OAuthFlowClient {
    config: Arc<TenantConfig>,
    http: reqwest::Client,
}

impl OAuthFlowClient {
    pub fn new(config: Arc<TenantConfig>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Uses a caller-configured HTTP client (proxies, timeouts, etc.).
    pub fn with_client(config: Arc<TenantConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &TenantConfig {
        &self.config
    }

    /// OpenID configuration discovery document for the configured tenant.
    pub fn openid_configuration_url(&self) -> Url {
        self.endpoint(&[".well-known", "openid-configuration"])
    }

    /// Endpoint the user is redirected to for authorization.
    pub fn authorization_url(&self) -> Url {
        self.endpoint(&["oauth2", "authorize"])
    }

    /// Endpoint for code and refresh-token exchanges.
    pub fn token_url(&self) -> Url {
        self.endpoint(&["oauth2", "token"])
    }

    /// Endpoint publishing the tenant's signing keys.
    pub fn key_set_url(&self) -> Url {
        self.endpoint(&["discovery", "keys"])
    }

    fn endpoint(&self, suffix: &[&str]) -> Url {
        let mut url = self.config.authority.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("authority URL is a valid base");
            segments.pop_if_empty().push(self.config.tenant_id());
            segments.extend(suffix);
        }
        url
    }

    /// Query parameters for the authorization request beyond the redirect
    /// URI and state. Caller-supplied `overrides` win over the defaults; the
    /// configured `resource` parameter is added only when it is not already
    /// present among the overrides.
    pub fn authorization_params(&self, overrides: &[(String, String)]) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("response_type".to_string(), "code".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("scope".to_string(), DEFAULT_SCOPES.join(" ")),
        ];

        for (key, value) in overrides {
            match params.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1 = value.clone(),
                None => params.push((key.clone(), value.clone())),
            }
        }

        if let Some(resource) = self.config.resource.as_ref() {
            if !params.iter().any(|(k, _)| k == "resource") {
                params.push(("resource".to_string(), resource.clone()));
            }
        }

        params
    }

    /// Exchanges an authorization code for a [`TokenBundle`].
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> AuthResult<TokenBundle> {
        let mut params: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        if let Some(resource) = self.config.resource.as_deref() {
            params.push(("resource", resource));
        }
        self.request_token(&params).await
    }

    /// Exchanges a refresh token for a fresh [`TokenBundle`].
    pub async fn refresh_access_token(&self, refresh_token: &str) -> AuthResult<TokenBundle> {
        let mut params: Vec<(&str, &str)> = vec![
            ("grant_type", "refresh_token"),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("refresh_token", refresh_token),
        ];
        if let Some(resource) = self.config.resource.as_deref() {
            params.push(("resource", resource));
        }
        self.request_token(&params).await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> AuthResult<TokenBundle> {
        let token_url = self.token_url();
        tracing::debug!(url = %token_url, grant_type = params.first().map(|(_, v)| *v).unwrap_or(""), "requesting tokens");

        let response = self
            .http
            .post(token_url)
            .form(params)
            .send()
            .await
            .map_err(|err| AuthError::TokenExchange {
                status: None,
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(AuthError::TokenExchange {
                status: Some(status.as_u16()),
                reason,
            });
        }

        response
            .json::<TokenBundle>()
            .await
            .map_err(|err| AuthError::TokenExchange {
                status: Some(status.as_u16()),
                reason: format!("invalid token response: {err}"),
            })
    }
}
