use crate::helpers::{error_message, spawn_app, spawn_app_with};

#[tokio::test]
async fn site_key_is_exposed_when_configured() {
    let app = spawn_app().await;

    let response = app.get_site_key().await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["siteKey"], "turnstile-site-key");
}

#[tokio::test]
async fn missing_site_key_is_a_configuration_error() {
    let app = spawn_app_with(|c| c.turnstile.site_key = None).await;

    let response = app.get_site_key().await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(error_message(response).await, "Service configuration error: PUBLIC_TURNSTILE_SITE_KEY");
}
