use serde_json::json;
use wiremock::matchers::{any, body_json, header};
use wiremock::{Mock, ResponseTemplate};
use crate::helpers::{contact_created, error_message, spawn_app, spawn_app_with, valid_body};

#[tokio::test]
async fn subscribe_returns_200_for_a_verified_valid_email() {
    let app = spawn_app().await;
    app.mock_verification(true, 1).await;
    app.mock_create_contact(contact_created(), 1).await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "message": "Successfully subscribed!"}));
}

#[tokio::test]
async fn subscribe_forwards_the_token_and_the_email() {
    let app = spawn_app().await;

    Mock::given(body_json(json!({
        "secret": "turnstile-secret",
        "response": "XXXX.DUMMY.TOKEN.XXXX",
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
    .expect(1)
    .mount(&app.turnstile_server)
    .await;

    Mock::given(header("Authorization", "Bearer re_test_key"))
        .and(body_json(json!({
            "email": "ursula_le_guin@gmail.com",
            "unsubscribed": false,
        })))
        .respond_with(contact_created())
        .expect(1)
        .mount(&app.resend_server)
        .await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing() {
    let app = spawn_app().await;
    app.mock_verification(true, 0).await;
    app.mock_create_contact(contact_created(), 0).await;

    let test_cases = vec![
        (json!({"turnstileToken": "token"}), "missing the email"),
        (json!({"email": "", "turnstileToken": "token"}), "empty email"),
        (json!({"email": 12, "turnstileToken": "token"}), "email is a number"),
        (json!({"email": {"address": "a@b.c"}, "turnstileToken": "token"}), "email is an object"),
        (json!({}), "empty body"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscribe(body).await;
        assert_eq!(400, response.status().as_u16(), "{}", description);
        assert_eq!(error_message(response).await, "Email is required", "{}", description);
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_not_json() {
    let app = spawn_app().await;

    let response = app.post_subscribe_raw("email=ursula_le_guin%40gmail.com".into()).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(error_message(response).await, "Email is required");
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_malformed() {
    let app = spawn_app().await;
    app.mock_verification(true, 0).await;

    for email in ["foo", "foo@bar", "@bar.com", "ursula le guin@gmail.com"] {
        let response = app.post_subscribe(json!({"email": email, "turnstileToken": "token"})).await;
        assert_eq!(400, response.status().as_u16(), "{}", email);
        assert_eq!(error_message(response).await, "Invalid email format", "{}", email);
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_token_is_missing() {
    let app = spawn_app().await;
    app.mock_verification(true, 0).await;

    let test_cases = vec![
        (json!({"email": "ursula_le_guin@gmail.com"}), "missing the token"),
        (json!({"email": "ursula_le_guin@gmail.com", "turnstileToken": ""}), "empty token"),
        (json!({"email": "ursula_le_guin@gmail.com", "turnstileToken": 1}), "token is a number"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscribe(body).await;
        assert_eq!(400, response.status().as_u16(), "{}", description);
        assert_eq!(error_message(response).await, "Verification required", "{}", description);
    }
}

#[tokio::test]
async fn subscribe_does_not_add_the_contact_when_verification_fails() {
    let app = spawn_app().await;
    app.mock_verification(false, 1).await;
    app.mock_create_contact(contact_created(), 0).await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(error_message(response).await, "Verification failed. Please try again.");
}

#[tokio::test]
async fn subscribe_returns_500_when_the_mailing_list_rejects_the_contact() {
    let app = spawn_app().await;
    app.mock_verification(true, 1).await;
    app.mock_create_contact(
        ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "The `email` field is invalid.",
        })),
        1,
    )
    .await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(error_message(response).await, "Failed to subscribe. Please try again.");
}

#[tokio::test]
async fn subscribe_returns_500_without_calling_out_when_a_secret_is_missing() {
    let test_cases: Vec<(fn(&mut blog_newsletter::configuration::Settings), &str)> = vec![
        (|c| c.turnstile.secret_key = None, "TURNSTILE_SECRET_KEY"),
        (|c| c.resend.api_key = None, "RESEND_API_KEY"),
        (|c| c.resend.audience_id = None, "RESEND_AUDIENCE_ID"),
    ];

    for (misconfigure, secret) in test_cases {
        let app = spawn_app_with(misconfigure).await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.turnstile_server)
            .await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.resend_server)
            .await;

        let response = app.post_subscribe(valid_body()).await;

        assert_eq!(500, response.status().as_u16(), "{}", secret);
        assert_eq!(
            error_message(response).await,
            format!("Service configuration error: {}", secret),
        );
        app.turnstile_server.verify().await;
        app.resend_server.verify().await;
    }
}

#[tokio::test]
async fn subscribe_returns_500_when_the_verification_answer_is_not_json() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .expect(1)
        .mount(&app.turnstile_server)
        .await;
    app.mock_create_contact(contact_created(), 0).await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(error_message(response).await, "An unexpected error occurred");
}

#[tokio::test]
async fn subscribe_returns_500_when_the_mailing_list_is_unreachable() {
    let app = spawn_app_with(|c| c.resend.timeout_milliseconds = Some(200)).await;
    app.mock_verification(true, 1).await;
    app.mock_create_contact(contact_created().set_delay(std::time::Duration::from_secs(30)), 1)
        .await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(error_message(response).await, "An unexpected error occurred");
}

#[tokio::test]
async fn subscribe_returns_400_when_the_verdict_is_falsy() {
    let test_cases = vec![
        (json!({"success": null}), "null success flag"),
        (json!({"success": 0}), "zero success flag"),
        (json!({"success": ""}), "empty success flag"),
        (json!([]), "verdict is an array"),
    ];

    for (verdict, description) in test_cases {
        let app = spawn_app().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(verdict))
            .expect(1)
            .mount(&app.turnstile_server)
            .await;
        app.mock_create_contact(contact_created(), 0).await;

        let response = app.post_subscribe(valid_body()).await;

        assert_eq!(400, response.status().as_u16(), "{}", description);
        assert_eq!(
            error_message(response).await,
            "Verification failed. Please try again.",
            "{}",
            description
        );
    }
}

#[tokio::test]
async fn subscribe_returns_200_when_the_mailing_list_omits_the_contact_id() {
    let app = spawn_app().await;
    app.mock_verification(true, 1).await;
    app.mock_create_contact(ResponseTemplate::new(200), 1).await;

    let response = app.post_subscribe(valid_body()).await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "message": "Successfully subscribed!"}));
}

#[tokio::test]
async fn subscribe_answers_an_oversized_body_with_json() {
    let app = spawn_app().await;
    app.mock_verification(true, 0).await;
    app.mock_create_contact(contact_created(), 0).await;

    let body = json!({
        "email": "ursula_le_guin@gmail.com",
        "turnstileToken": "x".repeat(300 * 1024),
    });
    let response = app.post_subscribe(body).await;

    assert_eq!(413, response.status().as_u16());
    assert_eq!(error_message(response).await, "Request body is too large");
}
