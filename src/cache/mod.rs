// 缓存模块
// 活跃事件列表以单个键整体缓存，带过期时间

pub mod operations;

use async_trait::async_trait;

use crate::models::Incident;

pub use operations::incident::IncidentCacheOperations;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 活跃事件缓存，调用方负责在出错时回退到数据库
#[async_trait]
pub trait IncidentCache: Send + Sync {
    /// 命中返回 `Some`，不存在或已过期返回 `None`
    async fn get_active(&self) -> Result<Option<Vec<Incident>>, CacheError>;

    /// 覆盖写入并重置过期时间
    async fn set_active(&self, incidents: &[Incident]) -> Result<(), CacheError>;

    /// 删除缓存，键不存在时也视为成功
    async fn invalidate_active(&self) -> Result<(), CacheError>;
}
