//! webhook 任务队列
//!
//! 生产者（位置检查）与消费者（投递 worker）之间唯一的共享结构。

mod redis_queue;

use async_trait::async_trait;

use crate::models::DeliveryTask;

pub use redis_queue::RedisDeliveryQueue;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue backend error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("task serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait DeliveryQueue: Send + Sync {
    /// 追加到队尾
    async fn enqueue(&self, task: &DeliveryTask) -> Result<(), QueueError>;

    /// 阻塞等待下一条消息并原子地取出，返回原始 JSON
    async fn dequeue(&self) -> Result<String, QueueError>;

    /// 重试耗尽的任务写入死信队列
    async fn dead_letter(&self, task: &DeliveryTask) -> Result<(), QueueError>;
}
