use std::time::Duration;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use crate::domain::SubscriberEmail;

/// Adds contacts to a Resend audience.
pub struct ResendClient {
    http_client: Client,
    base_url: String,
}

#[derive(Deserialize, Debug)]
pub struct CreatedContact {
    pub id: String,
}

/// Error object Resend returns alongside a non-2xx status.
#[derive(Deserialize, Debug)]
pub struct ProviderError {
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub name: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
pub enum CreateContactError {
    #[error("Resend rejected the contact with status {status}: {error:?}")]
    Rejected { status: u16, error: ProviderError },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ResendClient {
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            base_url,
        })
    }

    /// Creates the contact in the audience. Resend answers an already known
    /// address like a new one.
    ///
    /// Any 2xx means the contact exists; its id is only returned when the
    /// body carries one.
    #[tracing::instrument(name = "Adding the contact to the audience", skip(self, api_key, email))]
    pub async fn create_contact(
        &self,
        api_key: &SecretString,
        audience_id: &str,
        email: &SubscriberEmail,
    ) -> Result<Option<CreatedContact>, CreateContactError> {
        let address = format!("{}/audiences/{}/contacts", self.base_url, audience_id);
        let body = CreateContactRequest {
            email: email.as_ref(),
            unsubscribed: false,
        };
        let response = self.http_client
            .post(address)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let error = serde_json::from_str(&text).unwrap_or(ProviderError {
                status_code: Some(status.as_u16()),
                name: None,
                message: text,
            });
            return Err(CreateContactError::Rejected { status: status.as_u16(), error });
        }

        Ok(response.json::<CreatedContact>().await.ok())
    }
}


#[derive(Serialize)]
struct CreateContactRequest<'a> {
    email: &'a str,
    unsubscribed: bool,
}
