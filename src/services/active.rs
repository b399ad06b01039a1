use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::IncidentCache;
use crate::error::AppError;
use crate::models::Incident;
use crate::repository::IncidentRepository;

/// 活跃事件的读穿缓存
///
/// 缓存故障从不向调用方传播：读失败直接回退数据库，写失败只记录日志。
/// 并发未命中时通过 `reload` 互斥锁合并为一次数据库查询。
pub struct ActiveIncidentSource {
    repo: Arc<dyn IncidentRepository>,
    cache: Arc<dyn IncidentCache>,
    reload: Mutex<()>,
}

impl ActiveIncidentSource {
    pub fn new(repo: Arc<dyn IncidentRepository>, cache: Arc<dyn IncidentCache>) -> Self {
        Self {
            repo,
            cache,
            reload: Mutex::new(()),
        }
    }

    pub async fn get(&self) -> Result<Vec<Incident>, AppError> {
        match self.cache.get_active().await {
            Ok(Some(incidents)) => return Ok(incidents),
            Ok(None) => {}
            Err(e) => {
                // 缓存不可用时不排队，直接查库
                tracing::warn!("Active incidents cache read failed, falling back to store: {}", e);
                return self.load_and_populate().await;
            }
        }

        let _guard = self.reload.lock().await;

        // 等锁期间可能已有其他请求回填
        if let Ok(Some(incidents)) = self.cache.get_active().await {
            return Ok(incidents);
        }

        self.load_and_populate().await
    }

    async fn load_and_populate(&self) -> Result<Vec<Incident>, AppError> {
        let incidents = self.repo.get_active().await.map_err(|e| {
            tracing::error!("Failed to load active incidents: {}", e);
            e
        })?;

        if let Err(e) = self.cache.set_active(&incidents).await {
            tracing::warn!("Failed to repopulate active incidents cache: {}", e);
        }

        Ok(incidents)
    }

    /// 只供事件写操作调用
    pub(crate) async fn invalidate(&self) {
        if let Err(e) = self.cache.invalidate_active().await {
            tracing::error!("Failed to invalidate active incidents cache: {}", e);
        }
    }
}
