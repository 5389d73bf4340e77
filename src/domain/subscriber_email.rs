use once_cell::sync::Lazy;
use regex::Regex;

// JavaScript's `\s`, which unlike Unicode `White_Space` counts U+FEFF as
// whitespace and U+0085 as not.
const JS_WHITESPACE: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

// Syntactic check only: something, an `@`, something, a dot, something.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let local_or_domain = format!("[^@{}]+", JS_WHITESPACE);
    let non_space = format!("[^{}]+", JS_WHITESPACE);
    Regex::new(&format!(r"^{0}@{0}\.{1}$", local_or_domain, non_space))
        .expect("Invalid email pattern")
});

#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        if EMAIL_PATTERN.is_match(&email) {
            Ok(Self(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
