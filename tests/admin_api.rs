//! Admin API authentication and cache inspection.

use axum::http::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_admin_cache_requires_key() {
    let (upstream, _mock) = common::start_mock_upstream().await;
    let mut config = common::test_config(&upstream);
    config.admin.enabled = true;
    config.admin.api_key = "admin-secret".to_string();
    let (base, shutdown) = common::start_server(config).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{base}/admin/cache")).send().await.unwrap();
    assert_eq!(res.status().as_u16(), StatusCode::UNAUTHORIZED.as_u16());

    let res = client
        .get(format!("{base}/admin/cache"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), StatusCode::UNAUTHORIZED.as_u16());

    client.get(format!("{base}/api/crypto-coins")).send().await.unwrap();

    let res = client
        .get(format!("{base}/admin/cache"))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), StatusCode::OK.as_u16());
    let summary: Value = res.json().await.unwrap();
    assert_eq!(summary["entries"], 1);
    assert_eq!(summary["fresh"], 1);
    assert_eq!(summary["ttl_secs"], 300);
    assert_eq!(summary["cooldown_secs"], 600);

    let res = client
        .get(format!("{base}/admin/status"))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap();
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["api_key_configured"], true);

    shutdown.trigger();
}
