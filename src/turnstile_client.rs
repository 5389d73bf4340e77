use std::time::Duration;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use crate::domain::ChallengeToken;

/// Server-side half of the Turnstile challenge.
pub struct TurnstileClient {
    http_client: Client,
    base_url: String,
}

/// What the provider thinks of a token.
#[derive(Debug)]
pub struct VerificationResult {
    pub success: bool,
    /// Everything else the provider sent back (`error-codes`, `hostname`, ...).
    pub diagnostics: Value,
}

impl From<Value> for VerificationResult {
    /// Only a truthy `success` passes: a missing flag, `null`, `0`, `""` or a
    /// verdict that is not an object all count as a failure.
    fn from(mut verdict: Value) -> Self {
        let success = verdict
            .as_object_mut()
            .and_then(|fields| fields.remove("success"))
            .is_some_and(|flag| is_truthy(&flag));
        Self { success, diagnostics: verdict }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl TurnstileClient {
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

    /// Submits the token for verification.
    ///
    /// The provider answers with a JSON verdict whatever the status code, so
    /// only transport and decoding failures are errors here; a rejected token
    /// is an `Ok` with `success == false`.
    #[tracing::instrument(name = "Verifying the challenge token", skip_all)]
    pub async fn verify(
        &self,
        secret: &SecretString,
        token: &ChallengeToken,
    ) -> Result<VerificationResult, reqwest::Error> {
        let address = format!("{}/turnstile/v0/siteverify", self.base_url);
        let body = SiteVerifyRequest {
            secret: secret.expose_secret(),
            response: token.as_ref(),
        };
        self.http_client
            .post(address)
            .json(&body)
            .send()
            .await?
            .json::<Value>()
            .await
            .map(VerificationResult::from)
    }
}

#[derive(Serialize)]
struct SiteVerifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
}
