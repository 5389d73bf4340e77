use serde_json::Value;
use crate::domain::{ChallengeToken, SubscriberEmail};

/// A subscription request whose fields passed validation.
#[derive(Debug)]
pub struct NewSubscription {
    pub email: SubscriberEmail,
    pub challenge_token: ChallengeToken,
}

/// Why a request body was turned down. The messages are shown to the caller.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidSubscription {
    #[error("Email is required")]
    MissingEmail,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Verification required")]
    MissingChallengeToken,
}

impl NewSubscription {
    /// Validates a raw `{ "email": ..., "turnstileToken": ... }` body.
    ///
    /// Checks run in a fixed order and stop at the first failure. A body that
    /// is not JSON carries no email, so it fails the first check.
    pub fn parse_json(body: &[u8]) -> Result<Self, InvalidSubscription> {
        let body: Value =
            serde_json::from_slice(body).map_err(|_| InvalidSubscription::MissingEmail)?;

        let email = non_empty_str(&body, "email").ok_or(InvalidSubscription::MissingEmail)?;
        let email = SubscriberEmail::parse(email.to_string())
            .map_err(|_| InvalidSubscription::InvalidEmail)?;

        let token = non_empty_str(&body, "turnstileToken")
            .ok_or(InvalidSubscription::MissingChallengeToken)?;
        let challenge_token = ChallengeToken::parse(token.to_string())
            .map_err(|_| InvalidSubscription::MissingChallengeToken)?;

        Ok(Self { email, challenge_token })
    }
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
