//! 远程模型客户端
//!
//! 批改能力被抽象为 `GradingModel`，每个远程操作一个方法。
//! 真实实现见 `gemini_client`，测试中可替换为脚本化的假实现。

pub mod gemini_client;
pub mod scripted;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::RemoteError;
use crate::models::EncodedFile;

pub use gemini_client::GeminiClient;
pub use scripted::ScriptedModel;

/// 请求中的一段内容
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart {
    /// 指令或结构化数据的文本
    Text(String),
    /// 内联文件（base64 + 媒体类型）
    Inline(EncodedFile),
}

/// 发给远程模型的完整请求
///
/// `response_schema` 约束模型的 JSON 输出结构
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub parts: Vec<RequestPart>,
    pub response_schema: JsonValue,
}

impl ModelRequest {
    pub fn new(response_schema: JsonValue) -> Self {
        Self {
            parts: Vec::new(),
            response_schema,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(RequestPart::Text(text.into()));
        self
    }

    pub fn inline(mut self, file: EncodedFile) -> Self {
        self.parts.push(RequestPart::Inline(file));
        self
    }

    /// 内联文件数量
    pub fn inline_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, RequestPart::Inline(_)))
            .count()
    }
}

/// 远程批改能力
///
/// 成功时返回模型输出的原始 JSON 文本（可能为空），失败时返回带状态码的 `RemoteError`。
/// 解析与重试由上层服务负责。
#[async_trait]
pub trait GradingModel: Send + Sync {
    /// 根据题目生成标准答案
    async fn synthesize_key(&self, request: &ModelRequest) -> Result<String, RemoteError>;

    /// 批改一份答卷
    async fn grade_submission(&self, request: &ModelRequest) -> Result<String, RemoteError>;
}
