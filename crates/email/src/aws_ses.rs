//! AWS SES transport for invitation email
//!
//! Setting `AWS_ENDPOINT_URL` points the client at LocalStack with static
//! credentials; otherwise the default AWS credential chain is used.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_REGION: &str = "eu-west-2";

pub struct SesEmailService {
    client: SesClient,
    sender: String,
}

impl SesEmailService {
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let sdk_config = load_sdk_config(&config).await;

        Ok(Self {
            client: SesClient::new(&sdk_config),
            sender: config.default_from,
        })
    }
}

async fn load_sdk_config(config: &EmailConfig) -> SdkConfig {
    let region = config
        .aws_region
        .clone()
        .unwrap_or_else(|| DEFAULT_REGION.to_string());
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

    match &config.aws_endpoint_url {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Using custom SES endpoint");
            let credentials = Credentials::new("test", "test", None, None, "roster-local-ses");
            loader
                .endpoint_url(endpoint)
                .credentials_provider(SharedCredentialsProvider::new(credentials))
                .load()
                .await
        }
        None => loader.load().await,
    }
}

fn utf8(data: &str, part: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::AwsSes(format!("invalid {}: {}", part, e)))
}

/// Subject plus text body, and the HTML alternative when present
fn to_ses_message(message: &EmailMessage) -> Result<Message, EmailError> {
    let html = message
        .body_html
        .as_deref()
        .map(|html| utf8(html, "html body"))
        .transpose()?;

    let body = Body::builder()
        .text(utf8(&message.body_text, "text body")?)
        .set_html(html)
        .build();

    Ok(Message::builder()
        .subject(utf8(&message.subject, "subject")?)
        .body(body)
        .build())
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let ses_message = to_ses_message(&message)?;

        let output = self
            .client
            .send_email()
            .source(&message.from)
            .destination(Destination::builder().to_addresses(&message.to).build())
            .message(ses_message)
            .send()
            .await
            .map_err(|e| EmailError::Delivery(format!("SES rejected the message: {}", e)))?;

        let message_id = output.message_id().to_string();
        tracing::info!(message_id = %message_id, "Email accepted by SES");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "aws-ses".to_string(),
            metadata: message.metadata,
        })
    }

    fn default_from(&self) -> String {
        self.sender.clone()
    }
}
