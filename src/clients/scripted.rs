//! 脚本化的模型实现
//!
//! 按预先设定的顺序返回成功或失败，不发起网络请求。
//! 用于在没有真实服务的情况下验证重试、退避和批处理逻辑。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::clients::{GradingModel, ModelRequest};
use crate::error::RemoteError;

/// 脚本化模型
#[derive(Debug, Default)]
pub struct ScriptedModel {
    key_responses: Mutex<VecDeque<Result<String, RemoteError>>>,
    grade_responses: Mutex<VecDeque<Result<String, RemoteError>>>,
    key_requests: Mutex<Vec<ModelRequest>>,
    grade_requests: Mutex<Vec<ModelRequest>>,
}

fn exhausted() -> RemoteError {
    RemoteError::new(None, "scripted model has no response left")
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个答案生成响应
    pub fn push_key(&self, response: Result<String, RemoteError>) -> &Self {
        if let Ok(mut queue) = self.key_responses.lock() {
            queue.push_back(response);
        }
        self
    }

    /// 追加一个批改响应
    pub fn push_grade(&self, response: Result<String, RemoteError>) -> &Self {
        if let Ok(mut queue) = self.grade_responses.lock() {
            queue.push_back(response);
        }
        self
    }

    /// 已收到的批改请求数
    pub fn grade_calls(&self) -> usize {
        self.grade_requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// 已收到的答案生成请求数
    pub fn key_calls(&self) -> usize {
        self.key_requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn grade_requests(&self) -> Vec<ModelRequest> {
        self.grade_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn key_requests(&self) -> Vec<ModelRequest> {
        self.key_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GradingModel for ScriptedModel {
    async fn synthesize_key(&self, request: &ModelRequest) -> Result<String, RemoteError> {
        if let Ok(mut requests) = self.key_requests.lock() {
            requests.push(request.clone());
        }
        self.key_responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn grade_submission(&self, request: &ModelRequest) -> Result<String, RemoteError> {
        if let Ok(mut requests) = self.grade_requests.lock() {
            requests.push(request.clone());
        }
        self.grade_responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(exhausted()))
    }
}
