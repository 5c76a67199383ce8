//! 答卷批改服务 - 业务能力层
//!
//! 只负责"一份答卷 → 一个批改结果"能力。
//!
//! ## 失败处理
//!
//! - 限流 / 过载：有限次重试，第 k 次失败后等待 k × 步长（线性退避）
//! - 文件过大：立即返回哨兵结果，不重试
//! - 其他失败（含空响应、解析失败）：立即返回带原因的哨兵结果
//!
//! 任何路径都返回完整的 `StudentResult`，错误不会越过本服务。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::clients::{GradingModel, ModelRequest};
use crate::config::Config;
use crate::error::{RemoteError, RemoteFailureKind};
use crate::infrastructure::Sleeper;
use crate::models::result::{REMARK_FILE_TOO_LARGE, REMARK_RETRIES_EXHAUSTED};
use crate::models::{AnswerKey, EncodedFile, StudentResult};
use crate::services::prompts;
use crate::utils::logging::truncate_text;

/// 模型未识别出身份时返回的占位符
const UNKNOWN_STUDENT: &str = "unknown";

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 线性退避步长
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_step: config.backoff_step(),
        }
    }

    /// 第 `attempt` 次（从 1 开始）失败后、下一次尝试前的等待时间
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// 单次尝试的失败
#[derive(Debug)]
enum AttemptError {
    Remote(RemoteError),
    EmptyResponse,
    Parse(serde_json::Error),
}

impl AttemptError {
    fn kind(&self) -> RemoteFailureKind {
        match self {
            AttemptError::Remote(e) => e.kind(),
            AttemptError::EmptyResponse | AttemptError::Parse(_) => RemoteFailureKind::Other,
        }
    }

    /// 写入备注的底层错误信息
    fn message(&self) -> String {
        match self {
            AttemptError::Remote(e) if !e.message.trim().is_empty() => e.message.clone(),
            AttemptError::Remote(e) => e.to_string(),
            AttemptError::EmptyResponse => "No grading response from model".to_string(),
            AttemptError::Parse(e) => format!("Invalid grading response: {}", e),
        }
    }
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptError::Remote(e) => write!(f, "{}", e),
            _ => write!(f, "{}", self.message()),
        }
    }
}

/// 答卷批改服务
///
/// 职责：
/// - 组装批改请求（批改策略 + 标准答案 + 文件名 + 答卷文件）
/// - 按失败类型重试或兜底
/// - 规范化学生身份
/// - 只处理单份答卷，不关心批次顺序和冷却
pub struct SubmissionGrader {
    model: Arc<dyn GradingModel>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl SubmissionGrader {
    pub fn new(model: Arc<dyn GradingModel>, sleeper: Arc<dyn Sleeper>, policy: RetryPolicy) -> Self {
        Self {
            model,
            sleeper,
            policy,
        }
    }

    /// 构建批改请求
    pub fn build_request(file: &EncodedFile, answer_key_json: &str) -> ModelRequest {
        ModelRequest::new(prompts::student_result_schema())
            .text(prompts::GRADING_INSTRUCTION)
            .text(prompts::answer_key_part(answer_key_json))
            .text(prompts::file_name_part(&file.file_name))
            .inline(file.clone())
    }

    /// 批改一份答卷
    ///
    /// 永远返回一个结果；失败时返回哨兵结果，学生身份为文件名
    pub async fn grade(&self, file: &EncodedFile, answer_key: &AnswerKey) -> StudentResult {
        let answer_key_json = match serde_json::to_string_pretty(answer_key) {
            Ok(json) => json,
            Err(e) => {
                error!("[{}] 标准答案序列化失败: {}", file.file_name, e);
                return StudentResult::processing_failed(&file.file_name, &e.to_string());
            }
        };
        let request = Self::build_request(file, &answer_key_json);

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(
                "[{}] 第 {}/{} 次批改请求",
                file.file_name, attempt, self.policy.max_attempts
            );

            let err = match self.attempt(&request).await {
                Ok(result) => return normalize_student_id(result, &file.file_name),
                Err(err) => err,
            };

            let kind = err.kind();

            if kind.is_transient() {
                if attempt < self.policy.max_attempts {
                    let delay = self.policy.backoff_for(attempt);
                    warn!(
                        "[{}] 第 {} 次尝试失败 ({}), {:.1} 秒后重试...",
                        file.file_name,
                        attempt,
                        err,
                        delay.as_secs_f64()
                    );
                    self.sleeper.sleep(delay).await;
                    continue;
                }
                error!(
                    "[{}] ❌ 已重试 {} 次仍被限流或服务过载: {}",
                    file.file_name, attempt, err
                );
                return StudentResult::failed(&file.file_name, REMARK_RETRIES_EXHAUSTED);
            }

            if kind == RemoteFailureKind::PayloadTooLarge {
                error!("[{}] ❌ 文件超过服务端大小限制: {}", file.file_name, err);
                return StudentResult::failed(&file.file_name, REMARK_FILE_TOO_LARGE);
            }

            error!("[{}] ❌ 批改失败: {}", file.file_name, err);
            return StudentResult::processing_failed(&file.file_name, &err.message());
        }
    }

    /// 单次尝试：调用模型并解析结果
    async fn attempt(&self, request: &ModelRequest) -> Result<StudentResult, AttemptError> {
        let text = self
            .model
            .grade_submission(request)
            .await
            .map_err(AttemptError::Remote)?;

        if text.trim().is_empty() {
            return Err(AttemptError::EmptyResponse);
        }

        serde_json::from_str::<StudentResult>(&text).map_err(|e| {
            debug!("无法解析的批改响应: {}", truncate_text(&text, 500));
            AttemptError::Parse(e)
        })
    }
}

/// 身份为空或为占位符时，改用文件名
fn normalize_student_id(mut result: StudentResult, file_name: &str) -> StudentResult {
    let student_id = result.student_id.trim();
    if student_id.is_empty() || student_id.eq_ignore_ascii_case(UNKNOWN_STUDENT) {
        info!("[{}] 未识别到学生身份，使用文件名", file_name);
        result.student_id = file_name.to_string();
    }
    result
}
