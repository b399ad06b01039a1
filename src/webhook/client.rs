use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::{DeliveryError, WebhookSink};
use crate::models::DeliveryTask;

#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        // 不跟随重定向，3xx 直接按失败处理
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

#[async_trait]
impl WebhookSink for WebhookClient {
    async fn send(&self, task: &DeliveryTask) -> Result<(), DeliveryError> {
        let body = task.to_json()?;

        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(DeliveryError::Status(status.as_u16()));
        }

        Ok(())
    }
}
