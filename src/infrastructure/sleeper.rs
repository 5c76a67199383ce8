//! 计时等待 - 基础设施层
//!
//! 退避与冷却是流程中仅有的两个挂起点，都经由 `Sleeper` 完成，
//! 测试中可替换为只记录时长、不真正等待的实现。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

/// 计时等待能力
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// 基于 tokio 定时器的实现
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 只记录等待时长的实现，立即返回
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按调用顺序返回所有等待时长
    pub fn calls(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(duration);
        }
    }
}
