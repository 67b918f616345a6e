use plant_service::config::CorsConfig;

use crate::common::{TestApp, routes};

const FRONTEND: &str = "http://localhost:4200";

#[tokio::test]
async fn configured_origin_is_allowed_with_credentials() {
    let app = TestApp::spawn().await;

    let res = app.preflight(routes::PLANTS, FRONTEND).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.header("access-control-allow-origin"), Some(FRONTEND));
    assert_eq!(res.header("access-control-allow-credentials"), Some("true"));
    assert_eq!(res.header("access-control-max-age"), Some("3600"));
}

#[tokio::test]
async fn unlisted_origin_gets_no_allow_origin() {
    let app = TestApp::spawn().await;

    let res = app
        .preflight(&routes::plant(1), "http://evil.example")
        .await;

    assert_eq!(res.header("access-control-allow-origin"), None);
}

#[tokio::test]
async fn wildcard_origin_allows_any_without_credentials() {
    let app = TestApp::spawn_with_cors(CorsConfig {
        allow_origins: vec!["*".into()],
        ..Default::default()
    })
    .await;

    let res = app.preflight(routes::PLANTS, "http://anywhere.example").await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    assert_eq!(res.header("access-control-allow-credentials"), None);
}
