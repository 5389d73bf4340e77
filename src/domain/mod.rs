mod challenge_token;
mod new_subscription;
mod subscriber_email;

pub use challenge_token::ChallengeToken;
pub use new_subscription::{InvalidSubscription, NewSubscription};
pub use subscriber_email::SubscriberEmail;
