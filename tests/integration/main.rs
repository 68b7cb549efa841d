// Integration tests against a mocked Google Play Developer API

mod acknowledger_test;
mod verifier_test;

use std::io::Write;

use playcheck::config::GooglePlayConfig;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const ACCESS_TOKEN: &str = "ya29.test-access-token";
pub const CLIENT_EMAIL: &str = "verifier@playcheck-test.iam.gserviceaccount.com";

pub struct TestEnvironment {
    pub server: MockServer,
    pub key_file: NamedTempFile,
}

impl TestEnvironment {
    pub fn config(&self) -> GooglePlayConfig {
        GooglePlayConfig {
            api_base_url: self.server.uri(),
            ..GooglePlayConfig::default()
        }
    }

    pub fn purchase_path(&self, kind: &str, item_id: &str, token: &str) -> String {
        format!(
            "/androidpublisher/v3/applications/the_package/purchases/{}/{}/tokens/{}",
            kind, item_id, token
        )
    }
}

// Test setup helpers
pub async fn setup_test_environment() -> TestEnvironment {
    let server = MockServer::start().await;

    let key = json!({
        "type": "service_account",
        "project_id": "playcheck-test",
        "private_key_id": "test-key-id",
        "private_key": include_str!("../fixtures/test_service_account_key.pem"),
        "client_email": CLIENT_EMAIL,
        "token_uri": format!("{}/token", server.uri()),
    });

    let mut key_file = NamedTempFile::new().expect("Failed to create key file");
    write!(key_file, "{}", key).expect("Failed to write key file");

    TestEnvironment { server, key_file }
}

/// Token endpoint that accepts any signed assertion
pub async fn mock_token_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

/// Token endpoint answering once with the given access token and lifetime
pub async fn mock_token_once(server: &MockServer, access_token: &str, expires_in: i64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "expires_in": expires_in,
            "token_type": "Bearer"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mock_token_failure(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(server)
        .await;
}

pub fn product_purchase_json() -> serde_json::Value {
    json!({
        "kind": "androidpublisher#productPurchase",
        "purchaseTimeMillis": "1421676237413",
        "purchaseState": 0,
        "consumptionState": 0,
        "developerPayload": "payload that gets stored and returned",
        "acknowledgementState": 1,
        "orderId": "GPA.3397-5532-8913-04415"
    })
}

pub fn insufficient_permissions() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "error": {
            "code": 401,
            "message": "The current user has insufficient permissions to perform the requested operation.",
            "errors": [{ "reason": "permissionDenied" }]
        }
    }))
}
