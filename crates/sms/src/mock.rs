//! Mock SMS Service Implementation
//!
//! Programmable mock for testing SMS workflows:
//! - `MockSmsService`: records every delivered message
//! - `MockSmsOutcome`: Deliver, RejectDestination, or Fail

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{SmsError, SmsReceipt, SmsService};

/// What outcome the mock should produce
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MockSmsOutcome {
    /// Accept the message
    #[default]
    Deliver,
    /// Refuse the destination number
    RejectDestination,
    /// Transport-level failure
    Fail,
}

/// Message recorded by the mock service
#[derive(Debug, Clone)]
pub struct SentSms {
    pub to: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

/// Mock SMS service for testing
#[derive(Debug, Clone, Default)]
pub struct MockSmsService {
    outcome: Arc<RwLock<MockSmsOutcome>>,
    sent: Arc<RwLock<Vec<SentSms>>>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock outcome
    pub fn set_outcome(&self, outcome: MockSmsOutcome) {
        *self.outcome.write().unwrap() = outcome;
    }

    pub fn get_outcome(&self) -> MockSmsOutcome {
        self.outcome.read().unwrap().clone()
    }

    /// All messages delivered so far
    pub fn sent_messages(&self) -> Vec<SentSms> {
        self.sent.read().unwrap().clone()
    }

    /// Messages delivered to one number
    pub fn messages_to(&self, to: &str) -> Vec<SentSms> {
        self.sent_messages()
            .into_iter()
            .filter(|m| m.to == to)
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    /// Reset to default behavior and forget recorded messages
    pub fn reset(&self) {
        *self.outcome.write().unwrap() = MockSmsOutcome::Deliver;
        self.sent.write().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, to: &str, body: &str) -> Result<SmsReceipt, SmsError> {
        match self.get_outcome() {
            MockSmsOutcome::RejectDestination => {
                tracing::info!(to = %to, "Mock SMS service rejecting destination");
                Err(SmsError::FormatRejected(to.to_string()))
            }
            MockSmsOutcome::Fail => {
                tracing::info!(to = %to, "Mock SMS service simulating failure");
                Err(SmsError::Delivery("mock provider unavailable".to_string()))
            }
            MockSmsOutcome::Deliver => {
                let now = Utc::now();
                self.sent.write().unwrap().push(SentSms {
                    to: to.to_string(),
                    body: body.to_string(),
                    sent_at: now,
                });

                tracing::info!(to = %to, "Mock SMS captured");

                Ok(SmsReceipt {
                    message_id: format!("mock-{}", Uuid::new_v4()),
                    to: to.to_string(),
                    sent_at: now,
                    provider: "mock".to_string(),
                })
            }
        }
    }
}
