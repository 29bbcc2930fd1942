//! Twilio SMS Client Implementation
//!
//! POSTs form-encoded messages to
//! `{base_url}/2010-04-01/Accounts/{sid}/Messages.json` with basic auth.

use chrono::Utc;
use serde::Deserialize;

use crate::{SmsConfig, SmsError, SmsReceipt, SmsService};

const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";

/// Twilio error codes meaning the destination number itself is unusable
/// (21211: invalid 'To' number, 21614: not a mobile number, 21217: number not reachable).
const DESTINATION_REJECTED_CODES: [u32; 3] = [21211, 21614, 21217];

/// Successful message resource (subset)
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Twilio REST error body
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<u32>,
    message: Option<String>,
}

/// Real Twilio client
pub struct TwilioSmsService {
    http: reqwest::Client,
    messages_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSmsService {
    /// Create a Twilio client; all credentials are required.
    pub fn new(config: SmsConfig) -> Result<Self, SmsError> {
        let account_sid = config
            .twilio_account_sid
            .ok_or_else(|| SmsError::Configuration("TWILIO_ACCOUNT_SID is required".to_string()))?;
        let auth_token = config
            .twilio_auth_token
            .ok_or_else(|| SmsError::Configuration("TWILIO_AUTH_TOKEN is required".to_string()))?;
        let from_number = config
            .from_number
            .ok_or_else(|| SmsError::Configuration("TWILIO_FROM_NUMBER is required".to_string()))?;

        let base_url = config
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let messages_url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            base_url.trim_end_matches('/'),
            account_sid
        );

        Ok(Self {
            http: reqwest::Client::new(),
            messages_url,
            account_sid,
            auth_token,
            from_number,
        })
    }
}

/// Classify a non-2xx Twilio response.
fn classify_error(to: &str, status: reqwest::StatusCode, body: &str) -> SmsError {
    let parsed: Option<TwilioErrorBody> = serde_json::from_str(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.to_string());

    match code {
        Some(code) if DESTINATION_REJECTED_CODES.contains(&code) => {
            SmsError::FormatRejected(format!("{} ({}): {}", to, code, message))
        }
        _ => SmsError::Delivery(format!("Twilio API returned {}: {}", status, message)),
    }
}

#[async_trait::async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        tracing::info!(to = %to, "Sending SMS via Twilio");

        let response = self
            .http
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| SmsError::Delivery(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());

        if !status.is_success() {
            let err = classify_error(to, status, &text);
            tracing::warn!(to = %to, status = %status, error = %err, "Twilio rejected SMS");
            return Err(err);
        }

        let resource: MessageResource = serde_json::from_str(&text)
            .map_err(|e| SmsError::Delivery(format!("Unexpected Twilio response: {}", e)))?;

        tracing::info!(message_id = %resource.sid, "SMS sent successfully via Twilio");

        Ok(SmsReceipt {
            message_id: resource.sid,
            to: to.to_string(),
            sent_at: Utc::now(),
            provider: "twilio".to_string(),
        })
    }
}
