//! Roster SMS Service
//!
//! Delivers invitation text messages:
//! - Twilio REST integration for production delivery
//! - Programmable mock for testing and development
//!
//! Providers distinguish a destination number they refuse to accept
//! (`SmsError::FormatRejected`) from every other delivery failure, so callers
//! can ask the user to re-enter the number instead of reporting an outage.

pub mod mock;
pub mod twilio;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("SMS configuration error: {0}")]
    Configuration(String),

    #[error("SMS destination rejected: {0}")]
    FormatRejected(String),

    #[error("SMS delivery error: {0}")]
    Delivery(String),
}

/// SMS delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsReceipt {
    pub message_id: String,
    pub to: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
}

/// SMS service configuration
#[derive(Clone)]
pub struct SmsConfig {
    /// SMS provider (twilio, mock)
    pub provider: String,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    /// Sending number in E.164 form
    pub from_number: Option<String>,
    /// Override for the Twilio API base URL (tests, proxies)
    pub api_base_url: Option<String>,
    /// Enable SMS sending (can disable for testing)
    pub enabled: bool,
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("provider", &self.provider)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("twilio_auth_token", &self.twilio_auth_token.as_ref().map(|_| "***"))
            .field("from_number", &self.from_number)
            .field("api_base_url", &self.api_base_url)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl SmsConfig {
    /// Create SMS config from environment variables
    pub fn from_env() -> Result<Self, SmsError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("SMS_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let enabled = std::env::var("SMS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            provider,
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok(),
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok(),
            from_number: std::env::var("TWILIO_FROM_NUMBER").ok(),
            api_base_url: std::env::var("TWILIO_API_BASE_URL").ok(),
            enabled,
        })
    }
}

/// SMS service trait for different providers
#[async_trait::async_trait]
pub trait SmsService: Send + Sync {
    /// Send a text message to an E.164 destination number
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError>;
}

/// Factory for creating SmsService implementations
pub struct SmsServiceFactory;

impl SmsServiceFactory {
    pub fn create(config: SmsConfig) -> Result<Box<dyn SmsService>, SmsError> {
        if !config.enabled {
            tracing::info!("SMS service disabled, using mock implementation");
            return Ok(Box::new(mock::MockSmsService::new()));
        }

        match config.provider.as_str() {
            "twilio" => {
                tracing::info!("Creating Twilio SMS service");
                Ok(Box::new(twilio::TwilioSmsService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock SMS service");
                Ok(Box::new(mock::MockSmsService::new()))
            }
            provider => Err(SmsError::Configuration(format!(
                "Unknown SMS provider: {}. Supported providers: twilio, mock",
                provider
            ))),
        }
    }
}
