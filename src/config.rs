use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub access: AccessSettings,
    pub log_level: String,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl DatabaseSettings {
    /// The configured connection string, if any. Blank values count as unset.
    pub fn connection_string(&self) -> Option<&Secret<String>> {
        self.url
            .as_ref()
            .filter(|url| !url.expose_secret().trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub notification_recipients: Vec<String>,
    pub support_recipient: String,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// Applies the variables of SMTP-relay deployments where the `APP_` ones are absent.
    ///
    /// `SMTP_PASS` was the SendGrid api key, used here as the bearer token, and `FROM_EMAIL`
    /// the sender. `SMTP_HOST`, `SMTP_PORT` and `SMTP_USER` have no counterpart.
    pub fn with_smtp_variables(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let set = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        if self.authorization_token.expose_secret().trim().is_empty() {
            if let Some(token) = set("SMTP_PASS") {
                self.authorization_token = Secret::new(token);
            }
        }
        if set("APP_EMAIL_CLIENT__SENDER_EMAIL").is_none() {
            if let Some(sender) = set("FROM_EMAIL") {
                self.sender_email = sender;
            }
        }

        self
    }
}

#[derive(Deserialize, Clone)]
pub struct AccessSettings {
    /// Consumer-facing domain on which admin paths are hidden.
    pub public_host: String,
    /// Domain an `Origin` header must contain to reach the protected API through `public_host`.
    pub admin_host: String,
    /// Full origin of the admin console, echoed in CORS headers.
    pub admin_origin: String,
    pub admin_paths: Vec<String>,
    pub protected_api_paths: Vec<String>,
}

const LIST_KEYS: [&str; 3] = [
    "email_client.notification_recipients",
    "access.admin_paths",
    "access.protected_api_paths",
];

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");

    let env_source = LIST_KEYS.iter().fold(
        config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |source, key| source.with_list_parse_key(key),
    );

    let settings = config::Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 8080)?
        .set_default("database.max_connections", 10)?
        .set_default("database.timeout_milliseconds", 2000)?
        .set_default("email_client.base_url", "https://api.sendgrid.com")?
        .set_default("email_client.sender_email", "noreply@matetees.com.au")?
        .set_default("email_client.authorization_token", "")?
        .set_default("email_client.timeout_milliseconds", 10000)?
        .set_default(
            "email_client.notification_recipients",
            vec!["info@matetees.com.au", "matt@matetees.com.au"],
        )?
        .set_default("email_client.support_recipient", "info@matetees.com.au")?
        .set_default("access.public_host", "matetees.app")?
        .set_default("access.admin_host", "matetees.com.au")?
        .set_default("access.admin_origin", "https://www.matetees.com.au")?
        .set_default("access.admin_paths", vec!["/dashboard", "/api/setup-db"])?
        .set_default(
            "access.protected_api_paths",
            vec!["/api/subscribers", "/api/import-subscribers"],
        )?
        .set_default("log_level", "waitlist=info,tower_http=info,axum::rejection=trace")?
        .add_source(config::File::from(configuration_directory.join("base")).required(false))
        .add_source(
            config::File::from(configuration_directory.join(environment.as_str())).required(false),
        )
        .add_source(env_source)
        .build()?;

    let mut settings = settings.try_deserialize::<Settings>()?;
    settings.email_client = settings
        .email_client
        .with_smtp_variables(|key| std::env::var(key).ok());

    Ok(settings)
}
