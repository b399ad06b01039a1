#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use uuid::Uuid;

use geofence_backend::AppState;
use geofence_backend::cache::{CacheError, IncidentCache};
use geofence_backend::config::Config;
use geofence_backend::error::AppError;
use geofence_backend::models::{DeliveryTask, Incident, LocationCheck};
use geofence_backend::queue::{DeliveryQueue, QueueError};
use geofence_backend::repository::{IncidentRepository, LocationRepository};
use geofence_backend::services::{
    ActiveIncidentSource, IncidentService, LocationService, StatsService,
};

pub fn incident_at(lat: f64, lng: f64, radius: f64) -> Incident {
    let now = Utc::now();
    Incident {
        id: Uuid::new_v4(),
        title: "test zone".into(),
        lat,
        lng,
        radius,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn backend_down() -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"))
}

pub async fn wait_until<F: Fn() -> bool>(cond: F, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

#[derive(Default)]
pub struct MemoryIncidentRepo {
    pub incidents: Mutex<Vec<Incident>>,
    pub active_loads: AtomicUsize,
    pub fail_loads: AtomicBool,
    pub load_delay: Mutex<Option<Duration>>,
}

impl MemoryIncidentRepo {
    pub fn with(incidents: Vec<Incident>) -> Self {
        let repo = Self::default();
        *repo.incidents.lock().unwrap() = incidents;
        repo
    }
}

#[async_trait]
impl IncidentRepository for MemoryIncidentRepo {
    async fn create(&self, incident: &Incident) -> Result<(), AppError> {
        let mut incidents = self.incidents.lock().unwrap();
        if incidents.iter().any(|i| i.id == incident.id) {
            return Err(AppError::Duplicate);
        }
        incidents.push(incident.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Incident, AppError> {
        self.incidents
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, incident: &Incident) -> Result<(), AppError> {
        let mut incidents = self.incidents.lock().unwrap();
        match incidents.iter_mut().find(|i| i.id == incident.id) {
            Some(slot) => {
                *slot = incident.clone();
                Ok(())
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn deactivate(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let mut incidents = self.incidents.lock().unwrap();
        match incidents.iter_mut().find(|i| i.id == id) {
            Some(slot) => {
                slot.is_active = false;
                slot.updated_at = at;
                Ok(())
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn list_with_total(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Incident>, i64), AppError> {
        let incidents = self.incidents.lock().unwrap();
        let page = incidents
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, incidents.len() as i64))
    }

    async fn get_active(&self) -> Result<Vec<Incident>, AppError> {
        self.active_loads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.load_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .incidents
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.is_active)
            .cloned()
            .collect())
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        Ok(self
            .incidents
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.is_active)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct MemoryLocationRepo {
    pub checks: Mutex<Vec<LocationCheck>>,
    pub fail_saves: AtomicBool,
}

#[async_trait]
impl LocationRepository for MemoryLocationRepo {
    async fn save(&self, check: &LocationCheck) -> Result<(), AppError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.checks.lock().unwrap().push(check.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<LocationCheck>, AppError> {
        Ok(self
            .checks
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_unique_users(&self, since: DateTime<Utc>) -> Result<i64, AppError> {
        let mut users: Vec<Uuid> = self
            .checks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.timestamp >= since)
            .map(|c| c.user_id)
            .collect();
        users.sort();
        users.dedup();
        Ok(users.len() as i64)
    }
}

/// 带过期时间的单键缓存
pub struct MemoryCache {
    entry: Mutex<Option<(String, Instant)>>,
    ttl: Duration,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub invalidations: AtomicUsize,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            invalidations: AtomicUsize::new(0),
        }
    }

    pub fn is_populated(&self) -> bool {
        self.entry.lock().unwrap().is_some()
    }
}

#[async_trait]
impl IncidentCache for MemoryCache {
    async fn get_active(&self) -> Result<Option<Vec<Incident>>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Redis(backend_down()));
        }
        let entry = self.entry.lock().unwrap().clone();
        match entry {
            Some((json, expires_at)) if Instant::now() < expires_at => {
                Ok(Some(serde_json::from_str(&json)?))
            }
            _ => Ok(None),
        }
    }

    async fn set_active(&self, incidents: &[Incident]) -> Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Redis(backend_down()));
        }
        let json = serde_json::to_string(incidents)?;
        *self.entry.lock().unwrap() = Some((json, Instant::now() + self.ttl));
        Ok(())
    }

    async fn invalidate_active(&self) -> Result<(), CacheError> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Redis(backend_down()));
        }
        *self.entry.lock().unwrap() = None;
        Ok(())
    }
}

/// 内存 FIFO：push_back 入队，pop_front 出队
#[derive(Default)]
pub struct MemoryQueue {
    items: Mutex<VecDeque<String>>,
    notify: Notify,
    /// 通过 `enqueue` 写入的全部任务（含重新入队）
    pub enqueued: Mutex<Vec<DeliveryTask>>,
    pub dead: Mutex<Vec<DeliveryTask>>,
    pub fail_enqueue: AtomicBool,
}

impl MemoryQueue {
    pub fn push_raw(&self, raw: impl Into<String>) {
        self.items.lock().unwrap().push_back(raw.into());
        self.notify.notify_one();
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn enqueued_count(&self) -> usize {
        self.enqueued.lock().unwrap().len()
    }

    pub fn dead_count(&self) -> usize {
        self.dead.lock().unwrap().len()
    }
}

#[async_trait]
impl DeliveryQueue for MemoryQueue {
    async fn enqueue(&self, task: &DeliveryTask) -> Result<(), QueueError> {
        if self.fail_enqueue.load(Ordering::SeqCst) {
            return Err(QueueError::Redis(backend_down()));
        }
        self.enqueued.lock().unwrap().push(task.clone());
        self.push_raw(task.to_json()?);
        Ok(())
    }

    async fn dequeue(&self) -> Result<String, QueueError> {
        loop {
            let next = self.items.lock().unwrap().pop_front();
            if let Some(item) = next {
                return Ok(item);
            }
            self.notify.notified().await;
        }
    }

    async fn dead_letter(&self, task: &DeliveryTask) -> Result<(), QueueError> {
        self.dead.lock().unwrap().push(task.clone());
        Ok(())
    }
}

pub struct Harness {
    pub incident_repo: Arc<MemoryIncidentRepo>,
    pub location_repo: Arc<MemoryLocationRepo>,
    pub cache: Arc<MemoryCache>,
    pub queue: Arc<MemoryQueue>,
    pub active: Arc<ActiveIncidentSource>,
    pub incidents: Arc<IncidentService>,
    pub locations: Arc<LocationService>,
    pub stats: Arc<StatsService>,
}

impl Harness {
    pub fn new(seed: Vec<Incident>) -> Self {
        let incident_repo = Arc::new(MemoryIncidentRepo::with(seed));
        let location_repo = Arc::new(MemoryLocationRepo::default());
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
        let queue = Arc::new(MemoryQueue::default());

        let active = Arc::new(ActiveIncidentSource::new(
            incident_repo.clone(),
            cache.clone(),
        ));
        let incidents = Arc::new(IncidentService::new(incident_repo.clone(), active.clone()));
        let locations = Arc::new(LocationService::new(
            location_repo.clone(),
            active.clone(),
            queue.clone(),
        ));
        let stats = Arc::new(StatsService::new(
            location_repo.clone(),
            Duration::from_secs(5 * 60),
        ));

        Self {
            incident_repo,
            location_repo,
            cache,
            queue,
            active,
            incidents,
            locations,
            stats,
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            config: Config::default(),
            incidents: self.incidents.clone(),
            locations: self.locations.clone(),
            stats: self.stats.clone(),
        }
    }
}
