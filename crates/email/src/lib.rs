//! Roster Email Service
//!
//! Sends invitation email through a pluggable `EmailService`:
//! - `aws_ses`: AWS SES (or LocalStack when `AWS_ENDPOINT_URL` is set)
//! - `mock`: in-memory capture for tests and local development

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aws_ses;
pub mod content;
pub mod mock;

const DEFAULT_SENDER: &str = "invitations@roster.app";

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("AWS SES error: {0}")]
    AwsSes(String),

    #[error("Email delivery error: {0}")]
    Delivery(String),
}

/// Outgoing email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    /// Free-form tags kept on the receipt (e.g. `email_type`)
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn email_type(&self) -> Option<&str> {
        self.metadata.get("email_type").map(String::as_str)
    }
}

/// Provider acknowledgement of a sent email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// `ses` / `aws-ses` or `mock`
    pub provider: String,
    pub aws_region: Option<String>,
    /// LocalStack endpoint
    pub aws_endpoint_url: Option<String>,
    /// Sender address of every invitation
    pub default_from: String,
    /// When false the mock is used in disabled mode and nothing is captured
    pub enabled: bool,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let enabled = match std::env::var("EMAIL_ENABLED") {
            Ok(value) => value.parse::<bool>().map_err(|_| {
                EmailError::Configuration(format!(
                    "EMAIL_ENABLED must be true or false, got {}",
                    value
                ))
            })?,
            Err(_) => true,
        };

        Ok(Self {
            provider: std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            aws_region: std::env::var("AWS_REGION").ok(),
            aws_endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            default_from: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_SENDER.to_string()),
            enabled,
        })
    }
}

#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Sender address used for outgoing email
    fn default_from(&self) -> String;

    /// Send the registration link to a prospective member
    async fn send_invitation(
        &self,
        recipient_email: &str,
        inviter: Option<&str>,
        action_link: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            content::INVITATION_SUBJECT.to_string(),
            content::invitation_text(inviter, action_link),
        )
        .with_html(content::invitation_html(inviter, action_link))
        .with_metadata("email_type", "invitation")
        .with_metadata("action_link", action_link);

        self.send_email(message).await
    }
}

pub struct EmailServiceFactory;

impl EmailServiceFactory {
    pub async fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email sending disabled, invitations will not be delivered");
            return Ok(Box::new(mock::MockEmailService::new_disabled()));
        }

        match config.provider.as_str() {
            "ses" | "aws-ses" => {
                tracing::info!(region = ?config.aws_region, "Creating AWS SES email service");
                Ok(Box::new(aws_ses::SesEmailService::new(config).await?))
            }
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::with_sender(
                    config.default_from,
                )))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: ses, mock",
                provider
            ))),
        }
    }
}
