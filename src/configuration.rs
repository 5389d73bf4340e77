use config::Config;
use secrecy::{ExposeSecret, SecretString};

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub turnstile: TurnstileSettings,
    pub resend: ResendSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    pub address: String,
    pub port: u16,
}

/// Cloudflare Turnstile, the challenge verification provider.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct TurnstileSettings {
    pub base_url: String,
    pub secret_key: Option<SecretString>,
    /// Public key rendered by the client-side widget.
    pub site_key: Option<String>,
    pub timeout_milliseconds: Option<u64>,
}

/// Resend, the mailing list provider.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct ResendSettings {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub audience_id: Option<String>,
    pub timeout_milliseconds: Option<u64>,
}

impl TurnstileSettings {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_milliseconds.map(std::time::Duration::from_millis)
    }
}

impl ResendSettings {
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_milliseconds.map(std::time::Duration::from_millis)
    }
}

/// The secrets a subscription cannot go without.
///
/// They stay optional in [`Settings`] so that a misconfigured deployment still
/// boots and answers every subscription attempt with a configuration error.
#[derive(Debug, Clone)]
pub struct SubscriptionSecrets {
    turnstile_secret_key: Option<SecretString>,
    resend_api_key: Option<SecretString>,
    resend_audience_id: Option<String>,
}

/// Secrets resolved for the lifetime of a single request.
#[derive(Debug)]
pub struct ResolvedSecrets {
    pub turnstile_secret_key: SecretString,
    pub resend_api_key: SecretString,
    pub resend_audience_id: String,
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("{0} is not configured")]
pub struct MissingSecret(pub &'static str);

impl From<&Settings> for SubscriptionSecrets {
    fn from(settings: &Settings) -> Self {
        Self {
            turnstile_secret_key: settings.turnstile.secret_key.clone(),
            resend_api_key: settings.resend.api_key.clone(),
            resend_audience_id: settings.resend.audience_id.clone(),
        }
    }
}

impl SubscriptionSecrets {
    /// Checked in the order the handler needs them; empty values count as missing.
    pub fn resolve(&self) -> Result<ResolvedSecrets, MissingSecret> {
        let turnstile_secret_key = present_secret(&self.turnstile_secret_key)
            .ok_or(MissingSecret(TURNSTILE_SECRET_KEY))?;
        let resend_api_key =
            present_secret(&self.resend_api_key).ok_or(MissingSecret(RESEND_API_KEY))?;
        let resend_audience_id = self
            .resend_audience_id
            .as_ref()
            .filter(|id| !id.trim().is_empty())
            .cloned()
            .ok_or(MissingSecret(RESEND_AUDIENCE_ID))?;

        Ok(ResolvedSecrets {
            turnstile_secret_key,
            resend_api_key,
            resend_audience_id,
        })
    }
}

fn present_secret(secret: &Option<SecretString>) -> Option<SecretString> {
    secret
        .as_ref()
        .filter(|s| !s.expose_secret().trim().is_empty())
        .cloned()
}

pub const TURNSTILE_SECRET_KEY: &str = "TURNSTILE_SECRET_KEY";
pub const PUBLIC_TURNSTILE_SITE_KEY: &str = "PUBLIC_TURNSTILE_SITE_KEY";
pub const RESEND_API_KEY: &str = "RESEND_API_KEY";
pub const RESEND_AUDIENCE_ID: &str = "RESEND_AUDIENCE_ID";

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");

    // The deployment platform exposes secrets under their conventional names,
    // those win over everything else.
    let settings = Config::builder()
        .add_source(config::File::from(configuration_directory.join("base")).required(true))
        .add_source(config::File::from(configuration_directory.join(environment.as_str())).required(true))
        .add_source(config::Environment::with_prefix("app").separator("__"))
        .set_override_option("turnstile.secret_key", std::env::var(TURNSTILE_SECRET_KEY).ok())?
        .set_override_option("turnstile.site_key", std::env::var(PUBLIC_TURNSTILE_SITE_KEY).ok())?
        .set_override_option("resend.api_key", std::env::var(RESEND_API_KEY).ok())?
        .set_override_option("resend.audience_id", std::env::var(RESEND_AUDIENCE_ID).ok())?
        .build()?;

    settings.try_deserialize()
}

/// The possible runtime environment for our application.
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local", Environment::Production => "production",
        } }
}
impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!("{} is not a supported environment. Use either `local` or `production`.", other )),
    } }
}
