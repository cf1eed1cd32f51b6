//! 并发限制器 - 基础设施层
//!
//! 唯一持有"处理槽位"的模块。槽位数量在创建时固定，
//! 任何时刻处于执行中的处理器数量都不会超过它。

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// 并发限制器
///
/// 基于计数信号量。获取到的许可在 drop 时自动归还，
/// 处理成功、失败还是 panic 都一样。槽位的分配顺序不做保证。
#[derive(Clone, Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// 创建限制器，容量至少为 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// 获取一个槽位，没有空闲槽位时挂起等待
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AcquireError> {
        self.semaphore.clone().acquire_owned().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前空闲槽位数
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let limiter = ConcurrencyLimiter::new(2);
        let first = limiter.acquire().await.unwrap();
        let _second = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 0);

        drop(first);
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let limiter = ConcurrencyLimiter::new(0);
        assert_eq!(limiter.capacity(), 1);
        let _permit = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available(), 0);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_free_slot() {
        let limiter = ConcurrencyLimiter::new(1);
        let permit = limiter.acquire().await.unwrap();

        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire().await.map(|_| ()) })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(permit);
        waiter.await.unwrap().unwrap();
    }
}
