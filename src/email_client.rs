use std::time::Duration;

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};

use crate::{config::EmailClientConfig, domain::ContactEmail};

/// 事务邮件中继服务的HTTP客户端
pub struct EmailClient {
    client: reqwest::Client,
    email_url: reqwest::Url,
    sender: ContactEmail,
    authorization_token: SecretString,
}

impl EmailClient {
    pub fn new(
        base_url: &str,
        sender: ContactEmail,
        timeout: Duration,
        authorization_token: SecretString,
    ) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build email client.")?;
        let email_url = reqwest::Url::parse(base_url)
            .and_then(|url| url.join("/email"))
            .with_context(|| format!("failed to parse base url `{base_url}`."))?;

        Ok(Self {
            client,
            email_url,
            sender,
            authorization_token,
        })
    }

    pub fn from_config(config: &EmailClientConfig) -> Result<Self, anyhow::Error> {
        let sender = config.sender().map_err(anyhow::Error::msg)?;

        Self::new(
            &config.base_url,
            sender,
            config.timeout(),
            config.authorization_token.clone(),
        )
    }

    #[tracing::instrument(name = "sending email", skip_all, fields(receiver = %receiver))]
    pub async fn send(
        &self,
        receiver: &ContactEmail,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> reqwest::Result<()> {
        let body = EmailRequestBody {
            from: self.sender.as_ref(),
            to: receiver.as_ref(),
            subject,
            text_body,
            html_body,
        };

        self.client
            .post(self.email_url.clone())
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct EmailRequestBody<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    html_body: &'a str,
}
