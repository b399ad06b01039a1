use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::repository::LocationRepository;

pub struct StatsService {
    locations: Arc<dyn LocationRepository>,
    window: Duration,
}

impl StatsService {
    pub fn new(locations: Arc<dyn LocationRepository>, window: Duration) -> Self {
        Self { locations, window }
    }

    pub fn window_minutes(&self) -> u64 {
        self.window.as_secs() / 60
    }

    /// 统计窗口内上报过位置的去重用户数
    pub async fn user_count(&self) -> Result<i64, AppError> {
        let window = chrono::Duration::from_std(self.window)
            .map_err(|e| AppError::Validation(format!("invalid stats window: {}", e)))?;
        let since = Utc::now() - window;

        self.locations.count_unique_users(since).await
    }
}
