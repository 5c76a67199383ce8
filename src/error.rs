use std::path::PathBuf;

use regex::Regex;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件编码错误
    #[error("编码错误: {0}")]
    Encoding(#[from] EncodingError),
    /// 远程模型调用错误
    #[error("远程调用错误: {0}")]
    Remote(#[from] RemoteError),
    /// 答案生成错误
    #[error("答案生成错误: {0}")]
    KeySynthesis(#[from] KeySynthesisError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 读取答卷/题目文件失败
///
/// 在批处理中只影响单个文件，不会中断整批
#[derive(Debug, Error)]
#[error("无法读取文件 {}: {source}", .path.display())]
pub struct EncodingError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// 远程模型返回的失败
///
/// `status` 为 HTTP 状态码（传输层失败时为空），`message` 为服务端原始消息
#[derive(Debug, Clone, Error)]
#[error("{}", display_remote(.status, .message))]
pub struct RemoteError {
    pub status: Option<u16>,
    pub message: String,
}

fn display_remote(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => message.to_string(),
    }
}

/// 远程失败分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailureKind {
    /// 请求频率限制（429）
    RateLimited,
    /// 服务过载（503）
    Overloaded,
    /// 文件超过服务端大小限制（400 / 413）
    PayloadTooLarge,
    /// 其他失败
    Other,
}

impl RemoteFailureKind {
    /// 是否为可重试的瞬时失败
    pub fn is_transient(self) -> bool {
        matches!(self, RemoteFailureKind::RateLimited | RemoteFailureKind::Overloaded)
    }
}

/// 从消息文本中提取独立出现的 429 / 503 状态码
fn status_code_in_message(message: &str) -> Option<u16> {
    let re = Regex::new(r"\b(429|503)\b").ok()?;
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 根据状态码和消息内容判断失败类型
    ///
    /// 瞬时失败优先于大小限制判断
    pub fn kind(&self) -> RemoteFailureKind {
        let code_in_message = status_code_in_message(&self.message);

        if self.status == Some(429)
            || code_in_message == Some(429)
            || self.message.contains("RESOURCE_EXHAUSTED")
        {
            return RemoteFailureKind::RateLimited;
        }
        if self.status == Some(503)
            || code_in_message == Some(503)
            || self.message.contains("UNAVAILABLE")
        {
            return RemoteFailureKind::Overloaded;
        }
        if matches!(self.status, Some(400) | Some(413))
            || self.message.contains("exceeds supported limit")
        {
            return RemoteFailureKind::PayloadTooLarge;
        }
        RemoteFailureKind::Other
    }
}

/// 答案生成（一次性步骤）失败，对本次运行是致命的
#[derive(Debug, Error)]
pub enum KeySynthesisError {
    /// 既没有题目文本也没有题目文件
    #[error("未提供题目：需要题目文本或题目文件")]
    EmptyInput,
    /// 远程调用失败
    #[error("模型调用失败: {0}")]
    Remote(#[from] RemoteError),
    /// 模型没有返回内容
    #[error("模型返回内容为空")]
    EmptyResponse,
    /// 返回内容无法解析为答案数组
    #[error("无法解析答案: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("不支持的答案文件格式: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("解析文件失败 ({}): {message}", .path.display())]
    ParseFailed { path: PathBuf, message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("缺少 API Key，请设置 LLM_API_KEY 或 GEMINI_API_KEY")]
    MissingApiKey,
    #[error("配置项 {name} 无效: {reason}")]
    Invalid { name: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
