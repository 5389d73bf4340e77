/// Token produced by the client-side human verification widget.
#[derive(Debug, Clone)]
pub struct ChallengeToken(String);

impl ChallengeToken {
    pub fn parse(token: String) -> Result<Self, String> {
        if token.is_empty() {
            Err("Challenge token is empty".to_string())
        } else {
            Ok(Self(token))
        }
    }
}

impl AsRef<str> for ChallengeToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
