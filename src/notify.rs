use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, message: &Message) -> anyhow::Result<()>;
}

/// Alert sent when a login arrives from an address not seen last time.
pub fn new_device_alert(ip: &str) -> Message {
    Message {
        subject: "Sign-in from a new device".into(),
        body: format!(
            "Your account was just signed in to from a new IP address: {ip}. \
             If this wasn't you, please change your password."
        ),
    }
}

/// Sends mail through an HTTP relay accepting `{from, to, subject, text}`.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

#[derive(Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(endpoint: &str, api_key: Option<String>, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key,
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, to: &str, message: &Message) -> anyhow::Result<()> {
        let mut req = self.client.post(&self.endpoint).json(&OutgoingMail {
            from: &self.from,
            to,
            subject: &message.subject,
            text: &message.body,
        });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        req.send()
            .await
            .context("mail relay request")?
            .error_for_status()
            .context("mail relay response")?;
        Ok(())
    }
}

/// Fallback when no relay is configured: the message only reaches the log.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, message: &Message) -> anyhow::Result<()> {
        info!(to, subject = %message.subject, body = %message.body, "notification (not delivered)");
        Ok(())
    }
}

pub fn from_config(cfg: &MailConfig) -> Arc<dyn Notifier> {
    match &cfg.api_url {
        Some(url) => Arc::new(HttpMailer::new(url, cfg.api_key.clone(), &cfg.from)),
        None => {
            warn!("MAIL_API_URL not set; login alerts will only be logged");
            Arc::new(LogNotifier)
        }
    }
}
