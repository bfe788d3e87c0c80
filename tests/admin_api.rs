//! Admin API surface: bearer auth and read-only views.

use bff_proxy::config::CacheRuleConfig;
use serde_json::Value;

mod common;

#[tokio::test]
async fn admin_requires_bearer_auth_and_reports_state() {
    let (backend, _log) = common::start_json_backend(200, r#"{"ok":true}"#).await;

    let mut config = common::proxy_config(&[("products", backend), ("cart", backend)]);
    config.cache.rules.push(CacheRuleConfig {
        pattern: "/all".to_string(),
        ttl_secs: 60,
        methods: None,
    });
    config.admin.enabled = true;
    config.admin.api_key = "test-key".to_string();
    config.admin.bind_address = "127.0.0.1:28561".to_string();

    let (proxy, shutdown) = common::spawn_proxy(config).await;
    let client = common::test_client();
    let admin = "http://127.0.0.1:28561";

    let res = client
        .get(format!("{admin}/admin/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "missing token is refused");

    let res = client
        .get(format!("{admin}/admin/status"))
        .header("Authorization", "Bearer wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401, "wrong token is refused");

    let status: Value = client
        .get(format!("{admin}/admin/status"))
        .header("Authorization", "Bearer test-key")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["routes"], 2);

    let routes: Value = client
        .get(format!("{admin}/admin/routes"))
        .header("Authorization", "Bearer test-key")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(routes[0]["service"], "cart");
    assert_eq!(routes[1]["service"], "products");

    // Warm the cache: one miss on the first call, one hit on the second.
    for _ in 0..2 {
        client
            .get(format!("{proxy}/products/all"))
            .send()
            .await
            .unwrap();
    }

    let cache: Value = client
        .get(format!("{admin}/admin/cache"))
        .header("Authorization", "Bearer test-key")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cache["entries"], 1);
    assert_eq!(cache["misses"], 1);
    assert_eq!(cache["hits"], 1);

    shutdown.trigger();
}
