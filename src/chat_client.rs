use reqwest::{Client, Error};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

/// Incoming-webhook client for a team chat channel.
#[derive(Clone)]
pub struct ChatWebhookClient {
    http_client: Client,
    webhook_url: Secret<String>,
}

impl ChatWebhookClient {
    pub fn new(webhook_url: Secret<String>, timeout: Duration) -> Result<Self, Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            webhook_url,
        })
    }

    pub async fn post_message(&self, text: &str) -> Result<(), Error> {
        self.http_client
            .post(self.webhook_url.expose_secret())
            .json(&PostMessageRequest { text })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    text: &'a str,
}
