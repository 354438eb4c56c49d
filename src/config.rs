use std::time::Duration;

use config::builder::{ConfigBuilder, DefaultState};
use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::ContactEmail;

#[derive(serde::Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub email_client: EmailClientConfig,
    pub contact_form: ContactFormConfig,
}

#[derive(serde::Deserialize)]
pub struct WebConfig {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl WebConfig {
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize)]
pub struct EmailClientConfig {
    pub base_url: String,
    pub sender: String,
    pub recipient: String,
    // 没有默认值，未配置时启动失败
    pub authorization_token: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientConfig {
    pub fn sender(&self) -> Result<ContactEmail, String> {
        ContactEmail::parse(&self.sender)
    }

    pub fn recipient(&self) -> Result<ContactEmail, String> {
        ContactEmail::parse(&self.recipient)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(serde::Deserialize)]
pub struct ContactFormConfig {
    pub endpoint_base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub notification_duration_milliseconds: u64,
}

impl ContactFormConfig {
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_milliseconds)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration.")]
    Load(#[from] config::ConfigError),
    #[error("`{0}` must not be empty.")]
    MissingSecret(&'static str),
    #[error("invalid `{field}`: {reason}")]
    InvalidAddress { field: &'static str, reason: String },
}

/// 读取配置
///
/// 优先级从低到高：内置默认值、`config.yaml`、`APP_`前缀的环境变量，
/// 例如`APP_EMAIL_CLIENT__AUTHORIZATION_TOKEN`。
pub fn config() -> Result<Config, ConfigError> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::new("config.yaml", config::FileFormat::Yaml).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    from_builder(builder)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("web.host", "127.0.0.1")?
        .set_default("web.port", 8000_i64)?
        .set_default("email_client.base_url", "https://api.postmarkapp.com")?
        .set_default("email_client.sender", "contact@example.com")?
        .set_default("email_client.recipient", "contact@example.com")?
        .set_default("email_client.timeout_milliseconds", 10_000_i64)?
        .set_default("contact_form.endpoint_base_url", "http://127.0.0.1:8000")?
        .set_default("contact_form.notification_duration_milliseconds", 6_000_i64)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        let email_client = &self.email_client;
        if email_client
            .authorization_token
            .expose_secret()
            .trim()
            .is_empty()
        {
            return Err(ConfigError::MissingSecret(
                "email_client.authorization_token",
            ));
        }
        email_client
            .sender()
            .map_err(|reason| ConfigError::InvalidAddress {
                field: "email_client.sender",
                reason,
            })?;
        email_client
            .recipient()
            .map_err(|reason| ConfigError::InvalidAddress {
                field: "email_client.recipient",
                reason,
            })?;

        Ok(())
    }
}
