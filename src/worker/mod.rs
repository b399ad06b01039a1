//! webhook 投递 worker
//!
//! 单个消费循环：阻塞出队 → 投递 → 成功丢弃 / 失败计数后延迟重新入队 /
//! 超过上限写入死信队列。延迟重试在独立任务中等待，不阻塞后续消息的消费。

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::models::DeliveryTask;
use crate::queue::DeliveryQueue;
use crate::webhook::WebhookSink;

/// 出队出错（如 Redis 断连）后的等待时间
const DEQUEUE_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// 单条消息处理后的结果
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered,
    /// 已计数，等待重新入队
    Retry(DeliveryTask),
    /// 重试次数已到上限
    Dropped(DeliveryTask),
    /// 消息无法解析，跳过
    Malformed,
}

pub struct DeliveryWorker {
    queue: Arc<dyn DeliveryQueue>,
    sink: Arc<dyn WebhookSink>,
    retry_limit: u32,
    retry_delay: Duration,
}

impl DeliveryWorker {
    pub fn new(
        queue: Arc<dyn DeliveryQueue>,
        sink: Arc<dyn WebhookSink>,
        retry_limit: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            queue,
            sink,
            retry_limit,
            retry_delay,
        }
    }

    /// 运行直到 `shutdown` 变为 true（或发送端被丢弃）
    ///
    /// 正在阻塞等待的出队会被放弃；尚在延迟中的重试会被立即写回队列后再退出。
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut pending = JoinSet::new();
        tracing::info!("Webhook worker started");

        loop {
            let dequeued = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                res = self.queue.dequeue() => res,
            };

            // 回收已经完成的延迟重试
            while pending.try_join_next().is_some() {}

            let raw = match dequeued {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::error!("Webhook worker dequeue error: {}", e);
                    tokio::select! {
                        biased;
                        _ = wait_for_shutdown(&mut shutdown) => break,
                        _ = tokio::time::sleep(DEQUEUE_ERROR_BACKOFF) => continue,
                    }
                }
            };

            match self.attempt(&raw).await {
                DeliveryOutcome::Retry(task) => {
                    self.schedule_requeue(&mut pending, task, shutdown.clone());
                }
                DeliveryOutcome::Dropped(task) => {
                    if let Err(e) = self.queue.dead_letter(&task).await {
                        tracing::error!(user_id = %task.user_id, "Failed to dead-letter webhook task: {}", e);
                    }
                }
                DeliveryOutcome::Delivered | DeliveryOutcome::Malformed => {}
            }
        }

        let flushing = pending.len();
        while pending.join_next().await.is_some() {}
        tracing::info!(flushed_retries = flushing, "Webhook worker stopped");
    }

    /// 对一条原始消息做一次投递尝试并决定其去向
    pub async fn attempt(&self, raw: &str) -> DeliveryOutcome {
        let mut task = match DeliveryTask::from_json(raw) {
            Ok(task) => task,
            Err(e) => {
                tracing::error!(data = %raw, "Failed to deserialize webhook task: {}", e);
                return DeliveryOutcome::Malformed;
            }
        };

        let err = match self.sink.send(&task).await {
            Ok(()) => {
                tracing::info!(
                    user_id = %task.user_id,
                    incident_ids = ?task.incident_ids,
                    "Webhook sent successfully"
                );
                return DeliveryOutcome::Delivered;
            }
            Err(e) => e,
        };

        // 计数来自队列消息，不能信任其取值
        task.retry = task.retry.saturating_add(1);
        if task.retry >= self.retry_limit {
            tracing::warn!(
                user_id = %task.user_id,
                incident_ids = ?task.incident_ids,
                retries = task.retry,
                "Webhook retry limit reached, dropping task: {}",
                err
            );
            return DeliveryOutcome::Dropped(task);
        }

        tracing::warn!(
            user_id = %task.user_id,
            incident_ids = ?task.incident_ids,
            retry = task.retry,
            "Webhook send failed, retrying: {}",
            err
        );
        DeliveryOutcome::Retry(task)
    }

    fn schedule_requeue(
        &self,
        pending: &mut JoinSet<()>,
        task: DeliveryTask,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let queue = Arc::clone(&self.queue);
        let delay = self.retry_delay;

        pending.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wait_for_shutdown(&mut shutdown) => {}
            }

            if let Err(e) = queue.enqueue(&task).await {
                tracing::error!(user_id = %task.user_id, "Failed to push webhook task back to queue: {}", e);
            }
        });
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    // 发送端被丢弃同样视为停止
    let _ = shutdown.wait_for(|stop| *stop).await;
}
