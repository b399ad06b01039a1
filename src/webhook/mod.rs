mod client;

use async_trait::async_trait;

use crate::models::DeliveryTask;

pub use client::WebhookClient;

/// 所有失败一律按可重试处理
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to serialize webhook payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook responded with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn send(&self, task: &DeliveryTask) -> Result<(), DeliveryError>;
}
