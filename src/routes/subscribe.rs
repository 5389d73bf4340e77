use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::Serialize;
use uuid::Uuid;
use crate::configuration::{MissingSecret, SubscriptionSecrets};
use crate::domain::{InvalidSubscription, NewSubscription};
use crate::resend_client::{CreateContactError, ResendClient};
use crate::routes::{error_chain_fmt, ErrorBody};
use crate::turnstile_client::TurnstileClient;

#[derive(Serialize)]
struct SubscribeResponse {
    success: bool,
    message: &'static str,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, secrets, turnstile_client, resend_client),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = tracing::field::Empty,
    )
)]
pub async fn subscribe(
    body: web::Bytes,
    secrets: web::Data<SubscriptionSecrets>,
    turnstile_client: web::Data<TurnstileClient>,
    resend_client: web::Data<ResendClient>,
) -> Result<HttpResponse, SubscribeError> {
    let subscription = NewSubscription::parse_json(&body)?;
    tracing::Span::current().record("subscriber_email", tracing::field::display(&subscription.email));

    let secrets = secrets.resolve().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let verification = turnstile_client
        .verify(&secrets.turnstile_secret_key, &subscription.challenge_token)
        .await
        .context("Failed to verify the challenge token")?;
    if !verification.success {
        tracing::error!(diagnostics = ?verification.diagnostics, "Challenge verification failed");
        return Err(SubscribeError::VerificationFailed);
    }

    let contact = resend_client
        .create_contact(&secrets.resend_api_key, &secrets.resend_audience_id, &subscription.email)
        .await
        .map_err(|e| match e {
            CreateContactError::Rejected { .. } => {
                tracing::error!(error = ?e, "Mailing list provider error");
                SubscribeError::SubscriptionFailed(e)
            }
            CreateContactError::Transport(e) => SubscribeError::UnexpectedError(
                anyhow::Error::new(e).context("Failed to reach the mailing list provider"),
            ),
        })?;
    match contact {
        Some(contact) => tracing::info!(contact_id = %contact.id, "New subscriber added to the audience"),
        None => tracing::info!("New subscriber added to the audience"),
    }

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        success: true,
        message: "Successfully subscribed!",
    }))
}


#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error(transparent)]
    ValidationError(#[from] InvalidSubscription),
    #[error(transparent)]
    ConfigurationError(#[from] MissingSecret),
    #[error("The challenge token was rejected")]
    VerificationFailed,
    #[error("Failed to add the contact to the audience")]
    SubscriptionFailed(#[source] CreateContactError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl SubscribeError {
    /// What the caller gets to see; the cause chain only goes to the logs.
    fn public_message(&self) -> String {
        match self {
            SubscribeError::ValidationError(e) => e.to_string(),
            SubscribeError::ConfigurationError(MissingSecret(name)) => {
                format!("Service configuration error: {}", name)
            }
            SubscribeError::VerificationFailed => "Verification failed. Please try again.".into(),
            SubscribeError::SubscriptionFailed(_) => "Failed to subscribe. Please try again.".into(),
            SubscribeError::UnexpectedError(_) => "An unexpected error occurred".into(),
        }
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) | SubscribeError::VerificationFailed => {
                StatusCode::BAD_REQUEST
            }
            SubscribeError::ConfigurationError(_)
            | SubscribeError::SubscriptionFailed(_)
            | SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.public_message(),
        })
    }
}
