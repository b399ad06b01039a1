use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use std::sync::Arc;

use super::{DeliveryQueue, QueueError};
use crate::models::DeliveryTask;

/// 基于 Redis 列表的队列：LPUSH 入队，BRPOP 出队
pub struct RedisDeliveryQueue {
    redis_client: Arc<RedisClient>,
    key: String,
    dead_letter_key: String,
}

impl RedisDeliveryQueue {
    pub fn new(
        redis_client: Arc<RedisClient>,
        key: impl Into<String>,
        dead_letter_key: impl Into<String>,
    ) -> Self {
        Self {
            redis_client,
            key: key.into(),
            dead_letter_key: dead_letter_key.into(),
        }
    }

    async fn push(&self, key: &str, task: &DeliveryTask) -> Result<(), QueueError> {
        let json = task.to_json()?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.lpush(key, json).await?;
        Ok(())
    }
}

#[async_trait]
impl DeliveryQueue for RedisDeliveryQueue {
    async fn enqueue(&self, task: &DeliveryTask) -> Result<(), QueueError> {
        self.push(&self.key, task).await?;

        tracing::debug!(
            key = %self.key,
            user_id = %task.user_id,
            incident_count = task.incident_ids.len(),
            retry = task.retry,
            "Webhook task enqueued"
        );
        Ok(())
    }

    async fn dequeue(&self) -> Result<String, QueueError> {
        // 阻塞读取需要独占连接，不与其他命令共用
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        loop {
            // 超时 0 表示无限等待
            let popped: Option<(String, String)> = redis::cmd("BRPOP")
                .arg(&self.key)
                .arg(0)
                .query_async(&mut conn)
                .await?;

            if let Some((_key, payload)) = popped {
                return Ok(payload);
            }
        }
    }

    async fn dead_letter(&self, task: &DeliveryTask) -> Result<(), QueueError> {
        self.push(&self.dead_letter_key, task).await?;

        tracing::debug!(key = %self.dead_letter_key, user_id = %task.user_id, "Webhook task dead-lettered");
        Ok(())
    }
}
