//! 批改结果
//!
//! 每份答卷对应一个 `StudentResult`；失败的答卷用哨兵结果表示（题号 0、零分、错误备注）

use serde::{Deserialize, Serialize};

/// 重试耗尽（限流 / 过载）
pub const REMARK_RETRIES_EXHAUSTED: &str =
    "ERROR: System timeout or rate limit exceeded after retries.";
/// 文件超出服务端大小限制
pub const REMARK_FILE_TOO_LARGE: &str =
    "ERROR: File size exceeds API limit (50MB). Evaluation skipped.";
/// 本地读取文件失败
pub const REMARK_FILE_READ_ERROR: &str = "ERROR: File read error or client-side failure.";
/// 其他失败的备注前缀，后接底层错误信息
pub const REMARK_PROCESSING_FAILED_PREFIX: &str = "ERROR: Processing failed.";

/// 单个得分点的得分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterScore {
    pub name: String,
    pub score: f64,
}

/// 单道题的批改结果
///
/// `total_score` 和 `max_score` 直接采用模型返回的值，本地不重新计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedQuestion {
    pub question_no: u32,
    pub parameter_scores: Vec<ParameterScore>,
    pub total_score: f64,
    pub max_score: f64,
    pub remark: String,
}

impl GradedQuestion {
    /// 哨兵结果：表示整份答卷未能批改
    pub fn sentinel(remark: impl Into<String>) -> Self {
        Self {
            question_no: 0,
            parameter_scores: Vec::new(),
            total_score: 0.0,
            max_score: 0.0,
            remark: remark.into(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.question_no == 0 && self.parameter_scores.is_empty()
    }

    /// 各得分点得分之和
    pub fn parameter_sum(&self) -> f64 {
        self.parameter_scores.iter().map(|p| p.score).sum()
    }
}

/// 一份答卷的批改结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResult {
    /// 模型识别出的姓名/学号，识别不到时使用文件名
    pub student_id: String,
    pub evaluations: Vec<GradedQuestion>,
}

impl StudentResult {
    /// 构造失败结果
    pub fn failed(student_id: impl Into<String>, remark: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            evaluations: vec![GradedQuestion::sentinel(remark)],
        }
    }

    /// 构造 "ERROR: Processing failed. {message}" 失败结果
    pub fn processing_failed(student_id: impl Into<String>, message: &str) -> Self {
        Self::failed(
            student_id,
            format!("{} {}", REMARK_PROCESSING_FAILED_PREFIX, message),
        )
    }

    /// 是否为失败结果
    pub fn is_failed(&self) -> bool {
        self.evaluations.len() == 1 && self.evaluations[0].is_sentinel()
    }

    pub fn total_obtained(&self) -> f64 {
        self.evaluations.iter().map(|e| e.total_score).sum()
    }

    pub fn total_available(&self) -> f64 {
        self.evaluations.iter().map(|e| e.max_score).sum()
    }
}
