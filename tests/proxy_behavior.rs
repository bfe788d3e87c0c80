//! End-to-end proxy behavior against mock backends.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn unknown_service_gets_uniform_rejection() {
    let (backend, log) = common::start_json_backend(200, r#"{"items":[]}"#).await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/nope/items"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Cannot process request" }));
    assert_eq!(log.calls(), 0, "no backend may be contacted");

    shutdown.trigger();
}

#[tokio::test]
async fn root_path_has_no_service_segment() {
    let (backend, _log) = common::start_json_backend(200, "{}").await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client().get(&proxy).send().await.unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Cannot process request");

    shutdown.trigger();
}

#[tokio::test]
async fn forwards_remainder_path_and_query() {
    let (backend, log) = common::start_json_backend(200, r#"{"ok":true}"#).await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/cart/items/42?page=2&sort=asc"))
        .header("x-custom", "yes")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(log.calls(), 1);
    assert_eq!(log.last_path().unwrap(), "/items/42?page=2&sort=asc");

    let seen = log.last_headers().unwrap();
    assert_eq!(seen.get("x-custom").unwrap(), "yes");
    assert!(
        seen.get("x-request-id").is_some(),
        "request id must reach the backend"
    );
    assert!(
        seen.get("content-type").is_none(),
        "bodiless GET carries no content type"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn bare_service_segment_hits_backend_root() {
    let (backend, log) = common::start_json_backend(200, r#"{"all":[]}"#).await;
    let (proxy, shutdown) =
        common::spawn_proxy(common::proxy_config(&[("products", backend)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/products"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(log.last_path().unwrap(), "/");

    shutdown.trigger();
}

#[tokio::test]
async fn post_body_is_forwarded_with_defaulted_content_type() {
    let (backend, log) = common::start_json_backend(201, r#"{"id":"o-1"}"#).await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("orders", backend)])).await;

    let payload = r#"{"productId":"p-9","qty":1}"#;
    let res = common::test_client()
        .post(format!("{proxy}/orders/checkout"))
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["id"], "o-1");

    assert_eq!(log.calls(), 1);
    assert_eq!(log.last_body().unwrap().as_ref(), payload.as_bytes());
    assert_eq!(
        log.last_headers().unwrap().get("content-type").unwrap(),
        "application/json"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn explicit_content_type_is_kept() {
    let (backend, log) = common::start_json_backend(200, "{}").await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("orders", backend)])).await;

    common::test_client()
        .put(format!("{proxy}/orders/o-1"))
        .header("content-type", "application/merge-patch+json")
        .body(r#"{"qty":2}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(
        log.last_headers().unwrap().get("content-type").unwrap(),
        "application/merge-patch+json"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_error_status_and_message_are_relayed() {
    let (backend, _log) =
        common::start_json_backend(404, r#"{"message":"no such item"}"#).await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/cart/items/404"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "no such item" }));

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_error_without_message_gets_generic_text() {
    let (backend, _log) = common::start_json_backend(500, "exploded").await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/cart/items"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "error from backend service" }));

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_backend_is_rejected_uniformly() {
    let dead = common::refused_addr().await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", dead)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/cart/items"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Cannot process request" }));

    shutdown.trigger();
}

#[tokio::test]
async fn undecodable_upstream_payload_is_rejected() {
    let (backend, _log) = common::start_json_backend(200, "<html>not json</html>").await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client()
        .get(format!("{proxy}/cart/items"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Cannot process request");

    shutdown.trigger();
}

#[tokio::test]
async fn empty_success_body_passes_through() {
    let (backend, _log) = common::start_json_backend(204, "").await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;

    let res = common::test_client()
        .delete(format!("{proxy}/cart/items/1"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 204);
    assert!(res.bytes().await.unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn health_answers_locally_on_any_method() {
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[])).await;
    let client = common::test_client();

    let res = client.get(format!("{proxy}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OK");

    let res = client.post(format!("{proxy}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn request_id_is_echoed_to_the_caller() {
    let (backend, _log) = common::start_json_backend(200, "{}").await;
    let (proxy, shutdown) = common::spawn_proxy(common::proxy_config(&[("cart", backend)])).await;
    let client = common::test_client();

    let res = client
        .get(format!("{proxy}/cart/items"))
        .header("x-request-id", "caller-supplied-7")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "caller-supplied-7");

    let res = client.get(format!("{proxy}/cart/items")).send().await.unwrap();
    assert!(
        res.headers().get("x-request-id").is_some(),
        "generated id must be echoed"
    );

    shutdown.trigger();
}
