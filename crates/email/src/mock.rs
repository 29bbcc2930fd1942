//! In-memory email transport
//!
//! Keeps every outgoing message in a mailbox so tests can read the
//! registration link back out and follow an invitation to acceptance.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

const MOCK_SENDER: &str = "invitations@roster.app";
const TOKEN_PATTERN: &str = r"/invitations/invited-user/([A-Za-z0-9_-]+)";

/// A message accepted by the mock transport
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    pub fn is_invitation(&self) -> bool {
        self.message.email_type() == Some("invitation")
    }

    /// Token segment of the registration link, from either body
    pub fn extract_invitation_token(&self) -> Option<String> {
        let re = regex::Regex::new(TOKEN_PATTERN).ok()?;
        std::iter::once(self.message.body_text.as_str())
            .chain(self.message.body_html.as_deref())
            .find_map(|body| re.captures(body))
            .and_then(|captures| captures.get(1))
            .map(|token| token.as_str().to_string())
    }
}

#[derive(Debug, Default)]
struct Mailbox {
    delivered: Vec<CapturedEmail>,
    failure: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MockEmailService {
    mailbox: Arc<Mutex<Mailbox>>,
    sender: String,
    enabled: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::with_sender(MOCK_SENDER.to_string())
    }

    pub fn with_sender(sender: String) -> Self {
        Self {
            mailbox: Arc::new(Mutex::new(Mailbox::default())),
            sender,
            enabled: true,
        }
    }

    /// Accepts every message and keeps none of them
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    fn mailbox(&self) -> MutexGuard<'_, Mailbox> {
        self.mailbox.lock().unwrap()
    }

    /// Fail every send with a delivery error until `recover` is called
    pub fn fail_with(&self, reason: &str) {
        self.mailbox().failure = Some(reason.to_string());
    }

    pub fn recover(&self) {
        self.mailbox().failure = None;
    }

    pub fn sent(&self) -> Vec<CapturedEmail> {
        self.mailbox().delivered.clone()
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<CapturedEmail> {
        self.mailbox()
            .delivered
            .iter()
            .filter(|captured| captured.message.to == recipient)
            .cloned()
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.mailbox().delivered.len()
    }

    /// Most recent invitation delivered to `recipient`
    pub fn latest_invitation(&self, recipient: &str) -> Option<CapturedEmail> {
        self.sent_to(recipient)
            .into_iter()
            .rev()
            .find(CapturedEmail::is_invitation)
    }

    pub fn invitation_token(&self, recipient: &str) -> Option<String> {
        self.latest_invitation(recipient)?.extract_invitation_token()
    }

    pub fn reset(&self) {
        *self.mailbox() = Mailbox::default();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let mut mailbox = self.mailbox();

        if let Some(reason) = mailbox.failure.clone() {
            tracing::warn!(to = %message.to, reason = %reason, "Mock email delivery failing");
            return Err(EmailError::Delivery(reason));
        }

        let provider = if self.enabled { "mock" } else { "mock-disabled" };
        let receipt = EmailReceipt {
            message_id: format!("{}-{}", provider, Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: provider.to_string(),
            metadata: message.metadata.clone(),
        };

        if !self.enabled {
            tracing::debug!(to = %message.to, "Email disabled, dropping message");
            return Ok(receipt);
        }

        tracing::info!(
            to = %message.to,
            message_id = %receipt.message_id,
            email_type = ?message.email_type(),
            "Mock email captured"
        );

        mailbox.delivered.push(CapturedEmail {
            message,
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        });

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.sender.clone()
    }
}
