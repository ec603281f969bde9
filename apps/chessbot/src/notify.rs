//! Outbound relay of replies to the chat platform.
//!
//! Delivery is best effort: every attempt is bounded by a timeout and a
//! failure is only logged. Game state is never rolled back because a message
//! did not go out.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::RealmId;
use crate::error::AppError;
use crate::services::Reply;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, realm: &RealmId, replies: &[Reply]) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    realm_id: &'a RealmId,
    replies: &'a [Reply],
}

/// POSTs replies as JSON to a webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build notify client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn deliver(&self, realm: &RealmId, replies: &[Reply]) -> Result<(), AppError> {
        let payload = RelayPayload {
            realm_id: realm,
            replies,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("notify request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "notify endpoint returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Deliver `replies` within `timeout`. Returns whether delivery succeeded.
pub async fn relay(
    notifier: &dyn Notifier,
    timeout: Duration,
    realm: &RealmId,
    replies: &[Reply],
) -> bool {
    if replies.is_empty() {
        return true;
    }
    let outcome = match tokio::time::timeout(timeout, notifier.deliver(realm, replies)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::NotifyTimeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };
    match outcome {
        Ok(()) => {
            debug!(realm = %realm, count = replies.len(), "Replies relayed");
            true
        }
        Err(err) => {
            warn!(realm = %realm, error = %err, "Reply relay failed");
            false
        }
    }
}
