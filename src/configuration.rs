use crate::{
    chat_client::ChatWebhookClient,
    domain::SubscriberEmail,
    email_client::EmailClient,
    notifications::{EmailNotification, SignupNotifier},
};
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{
    postgres::{PgConnectOptions, PgSslMode},
    ConnectOptions,
};
use std::time::Duration;
use tracing_log::log::LevelFilter;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    pub notifications: NotificationSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    pub database_name: String,
    pub require_ssl: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl DatabaseSettings {
    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.database_name)
            .log_statements(LevelFilter::Trace)
    }

    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .ssl_mode(ssl_mode)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize)]
pub struct NotificationSettings {
    pub chat_webhook: ChatWebhookSettings,
    pub email: EmailNotificationSettings,
}

impl NotificationSettings {
    pub fn notifier(&self) -> Result<SignupNotifier, anyhow::Error> {
        Ok(SignupNotifier::new(
            self.chat_webhook.client()?,
            self.email.notification()?,
        ))
    }
}

#[derive(Deserialize)]
pub struct ChatWebhookSettings {
    #[serde(default)]
    pub url: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl ChatWebhookSettings {
    /// `None` when no webhook url is set.
    pub fn client(&self) -> Result<Option<ChatWebhookClient>, anyhow::Error> {
        let Some(url) = non_blank(&self.url) else {
            return Ok(None);
        };

        ChatWebhookClient::new(
            Secret::new(url.into()),
            Duration::from_millis(self.timeout_milliseconds),
        )
        .map(Some)
        .context("Failed to build chat webhook client")
    }
}

#[derive(Deserialize)]
pub struct EmailNotificationSettings {
    pub base_url: String,
    #[serde(default)]
    pub authorization_token: Option<Secret<String>>,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub recipients: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailNotificationSettings {
    /// `None` unless the token, the sender and at least one recipient are all set.
    pub fn notification(&self) -> Result<Option<EmailNotification>, anyhow::Error> {
        let Some(token) = non_blank(&self.authorization_token) else {
            return Ok(None);
        };
        let Some(sender) = self.sender() else {
            return Ok(None);
        };
        let recipients = self.recipients()?;
        if recipients.is_empty() {
            return Ok(None);
        }

        let client = EmailClient::new(
            self.base_url.clone(),
            sender.into(),
            Secret::new(token.into()),
            self.timeout(),
        )
        .context("Failed to build email client")?;

        Ok(Some(EmailNotification::new(client, recipients)))
    }

    /// Passed to the email API verbatim, so both `addr` and `Name <addr>` work.
    pub fn sender(&self) -> Option<&str> {
        self.sender_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Comma-separated recipients, trimmed, with empty entries dropped.
    pub fn recipients(&self) -> Result<Vec<SubscriberEmail>, anyhow::Error> {
        self.recipients
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| SubscriberEmail::parse(s.into()).map_err(anyhow::Error::msg))
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

fn non_blank(secret: &Option<Secret<String>>) -> Option<&str> {
    secret
        .as_ref()
        .map(|s| s.expose_secret().trim())
        .filter(|s| !s.is_empty())
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let config_dir = std::env::current_dir()
        .map(|dir| dir.join("configuration"))
        .expect("Failed to determine the current directory");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse app environment");

    let env_config = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(config::File::from(config_dir.join(env_config)))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "`{other}` is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
