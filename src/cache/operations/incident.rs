use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheError, IncidentCache};
use crate::models::Incident;

/// 活跃事件缓存操作
pub struct IncidentCacheOperations {
    redis_client: Arc<RedisClient>,
    key: String,
    ttl: Duration,
}

impl IncidentCacheOperations {
    pub fn new(redis_client: Arc<RedisClient>, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            redis_client,
            key: key.into(),
            ttl,
        }
    }

    /// Redis 不接受 0 秒过期
    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }
}

#[async_trait]
impl IncidentCache for IncidentCacheOperations {
    async fn get_active(&self) -> Result<Option<Vec<Incident>>, CacheError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(&self.key).await?;

        match cached {
            Some(json) => {
                let incidents: Vec<Incident> = serde_json::from_str(&json)?;
                tracing::debug!(key = %self.key, count = incidents.len(), "Active incidents cache hit");
                Ok(Some(incidents))
            }
            None => {
                tracing::debug!(key = %self.key, "Active incidents cache miss");
                Ok(None)
            }
        }
    }

    async fn set_active(&self, incidents: &[Incident]) -> Result<(), CacheError> {
        let json = serde_json::to_string(incidents)?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&self.key, json, self.ttl_secs()).await?;

        tracing::debug!(key = %self.key, count = incidents.len(), "Active incidents cached");
        Ok(())
    }

    async fn invalidate_active(&self) -> Result<(), CacheError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        // DEL 对不存在的键返回 0，不是错误
        let _: i64 = conn.del(&self.key).await?;

        tracing::debug!(key = %self.key, "Active incidents cache invalidated");
        Ok(())
    }
}
