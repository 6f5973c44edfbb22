mod harness;

use flourish_billing::{SIGNATURE_HEADER, sign};
use flourish_core::model::PremiumPlan;
use harness::config::ConfigBuilder;
use harness::failing_store::FailingStore;
use harness::mock_identity::MockIdentity;
use harness::server::TestServer;
use secrecy::SecretString;
use serde_json::{Value, json};

const SECRET: &str = "whsec-test";

async fn setup() -> (MockIdentity, TestServer) {
    let identity = MockIdentity::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_identity(&identity.base_url())
        .with_webhook_secret(SECRET)
        .build();
    let server = TestServer::start(config).await.unwrap();
    (identity, server)
}

async fn deliver(server: &TestServer, body: &str, signature: Option<String>) -> (u16, Value) {
    let mut request = server
        .client()
        .post(server.api("/webhooks/revenuecat"))
        .header("content-type", "application/json")
        .body(body.to_owned());
    if let Some(signature) = signature {
        request = request.header(SIGNATURE_HEADER, signature);
    }

    let resp = request.send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap_or(Value::Null))
}

fn signed(body: &str) -> Option<String> {
    Some(sign(&SecretString::from(SECRET), body.as_bytes()))
}

fn event(event_type: &str, app_user_id: &str) -> String {
    json!({
        "api_version": "1.0",
        "event": {
            "type": event_type,
            "app_user_id": app_user_id,
            "product_id": "flourish_premium_annual"
        }
    })
    .to_string()
}

#[tokio::test]
async fn grant_then_revoke() {
    let (_identity, server) = setup().await;
    server.sign_up("mum-1").await;

    let body = event("INITIAL_PURCHASE", "mum-1");
    let (status, reply) = deliver(&server, &body, signed(&body)).await;
    assert_eq!(status, 200);
    assert_eq!(reply, json!({ "ok": true, "received": true, "action": "grant" }));

    let user = server.state().store.get_user("mum-1").await.unwrap().unwrap();
    assert!(user.has_premium);
    assert_eq!(user.premium_plan, PremiumPlan::Annual);
    assert_eq!(user.revenuecat_id.as_deref(), Some("mum-1"));

    let activity = server.state().store.list_activity("mum-1").await.unwrap();
    assert_eq!(activity.last().unwrap().metadata["event"], "subscription_granted");

    let body = event("EXPIRATION", "mum-1");
    let (_, reply) = deliver(&server, &body, signed(&body)).await;
    assert_eq!(reply["action"], "revoke");

    let user = server.state().store.get_user("mum-1").await.unwrap().unwrap();
    assert!(!user.has_premium);
    assert_eq!(user.premium_plan, PremiumPlan::Free);
}

#[tokio::test]
async fn unrecognised_event_is_ignored() {
    let (_identity, server) = setup().await;
    server.sign_up("mum-2").await;

    let body = event("SUBSCRIPTION_PAUSED", "mum-2");
    let (status, reply) = deliver(&server, &body, signed(&body)).await;
    assert_eq!(status, 200);
    assert_eq!(reply, json!({ "ok": true, "received": true, "action": "ignored" }));

    let user = server.state().store.get_user("mum-2").await.unwrap().unwrap();
    assert!(!user.has_premium);
    assert!(user.revenuecat_id.is_none());
}

#[tokio::test]
async fn unknown_user_is_acknowledged() {
    let (_identity, server) = setup().await;

    let body = event("RENEWAL", "$RCAnonymousID:nobody");
    let (status, reply) = deliver(&server, &body, signed(&body)).await;
    assert_eq!(status, 200);
    assert_eq!(reply["action"], "user_not_found");
}

#[tokio::test]
async fn bad_or_missing_signature_is_401() {
    let (_identity, server) = setup().await;
    server.sign_up("mum-3").await;
    let body = event("INITIAL_PURCHASE", "mum-3");

    let (status, reply) = deliver(&server, &body, Some("deadbeef".to_owned())).await;
    assert_eq!(status, 401);
    assert_eq!(reply["ok"], false);

    let (status, _) = deliver(&server, &body, None).await;
    assert_eq!(status, 401);

    let user = server.state().store.get_user("mum-3").await.unwrap().unwrap();
    assert!(!user.has_premium);
}

#[tokio::test]
async fn malformed_payloads_are_400() {
    let (_identity, server) = setup().await;

    let body = "{not json";
    let (status, reply) = deliver(&server, body, signed(body)).await;
    assert_eq!(status, 400);
    assert_eq!(reply["error"], "Invalid JSON body");

    let body = json!({ "event": { "type": "RENEWAL" } }).to_string();
    let (status, reply) = deliver(&server, &body, signed(&body)).await;
    assert_eq!(status, 400);
    assert_eq!(reply["error"], "Invalid webhook payload");
}

#[tokio::test]
async fn no_secret_accepts_unsigned_events() {
    let identity = MockIdentity::start().await.unwrap();
    let config = ConfigBuilder::new().with_identity(&identity.base_url()).build();
    let server = TestServer::start(config).await.unwrap();
    server.sign_up("mum-4").await;

    let body = event("RENEWAL", "mum-4");
    let (status, reply) = deliver(&server, &body, None).await;
    assert_eq!(status, 200);
    assert_eq!(reply["action"], "grant");
}

#[tokio::test]
async fn store_failure_still_answers_200() {
    let identity = MockIdentity::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_identity(&identity.base_url())
        .with_webhook_secret(SECRET)
        .build();
    let server = TestServer::start_with_store(config, |store| FailingStore::wrap(store, &["update_user"]))
        .await
        .unwrap();
    server.sign_up("mum-5").await;

    let body = event("INITIAL_PURCHASE", "mum-5");
    let (status, reply) = deliver(&server, &body, signed(&body)).await;
    assert_eq!(status, 200);
    assert_eq!(reply, json!({ "ok": true, "received": true, "error": "internal" }));

    let user = server.state().store.get_user("mum-5").await.unwrap().unwrap();
    assert!(!user.has_premium);
}
