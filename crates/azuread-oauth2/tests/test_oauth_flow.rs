mod common;

use azuread_oauth2::{AuthError, OAuthFlowClient, TenantConfig};
use common::*;
use serde_json::json;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn flow_for(server: &MockServer, config: TenantConfig) -> OAuthFlowClient {
    let config = config.with_authority(Url::parse(&server.uri()).unwrap());
    OAuthFlowClient::new(Arc::new(config))
}

fn token_response() -> serde_json::Value {
    // The v1 endpoint returns numeric fields as decimal strings.
    json!({
        "access_token": "new-access-token",
        "token_type": "Bearer",
        "id_token": "header.payload.signature",
        "refresh_token": "new-refresh-token",
        "expires_in": "3600",
        "expires_on": (now_epoch() + 3600).to_string(),
        "not_before": now_epoch().to_string()
    })
}

#[tokio::test]
async fn code_exchange_posts_standard_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/common/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains(format!("client_id={CLIENT_ID}")))
        .and(body_string_contains("client_secret=shhh"))
        .and(body_string_contains("code=auth-code-123"))
        .and(body_string_contains("redirect_uri="))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow_for(&server, TenantConfig::new(CLIENT_ID, "shhh"));
    let bundle = flow
        .exchange_authorization_code("auth-code-123", "https://app.test/callback")
        .await
        .unwrap();

    assert_eq!(bundle.access_token, "new-access-token");
    assert_eq!(bundle.refresh_token.as_deref(), Some("new-refresh-token"));
    assert_eq!(bundle.expires_in, Some(3600));
    assert!(bundle.expires_on.unwrap() > now_epoch());
}

#[tokio::test]
async fn code_exchange_includes_resource_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/common/oauth2/token"))
        .and(body_string_contains("resource=https%3A%2F%2Fgraph.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow_for(
        &server,
        TenantConfig::new(CLIENT_ID, "shhh").with_resource("https://graph.test"),
    );
    flow.exchange_authorization_code("auth-code-123", "https://app.test/callback")
        .await
        .unwrap();
}

#[tokio::test]
async fn refresh_posts_refresh_grant_with_resource() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh-token"))
        .and(body_string_contains("resource=https%3A%2F%2Fgraph.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(&server)
        .await;

    let flow = flow_for(
        &server,
        TenantConfig::new(CLIENT_ID, "shhh")
            .with_tenant("contoso")
            .with_resource("https://graph.test"),
    );
    let bundle = flow.refresh_access_token("old-refresh-token").await.unwrap();
    assert_eq!(bundle.access_token, "new-access-token");
}

#[tokio::test]
async fn token_endpoint_error_maps_to_token_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/common/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "invalid_grant", "error_description": "expired" })),
        )
        .mount(&server)
        .await;

    let flow = flow_for(&server, TenantConfig::new(CLIENT_ID, "shhh"));
    let err = flow
        .exchange_authorization_code("stale-code", "https://app.test/callback")
        .await
        .unwrap_err();

    match err {
        AuthError::TokenExchange { status, reason } => {
            assert_eq!(status, Some(400));
            assert!(reason.contains("invalid_grant"));
        }
        other => panic!("expected TokenExchange, got {other:?}"),
    }
}
