//! 答案生成服务 - 业务能力层
//!
//! 只负责"题目 → 标准答案"能力。一次性步骤，不重试，失败即返回错误。

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::clients::{GradingModel, ModelRequest};
use crate::error::KeySynthesisError;
use crate::models::{AnswerKey, EncodedFile};
use crate::services::prompts;
use crate::utils::logging::truncate_text;

/// 答案生成服务
///
/// 职责：
/// - 组装题目文本与题目文件，请求结构化的标准答案
/// - 解析返回的答案数组
/// - 不重试，不兜底
pub struct KeySynthesizer {
    model: Arc<dyn GradingModel>,
}

impl KeySynthesizer {
    pub fn new(model: Arc<dyn GradingModel>) -> Self {
        Self { model }
    }

    /// 构建答案生成请求
    ///
    /// 空白的题目文本不会加入请求
    pub fn build_request(questions_text: &str, question_files: &[EncodedFile]) -> ModelRequest {
        let mut request = ModelRequest::new(prompts::answer_key_schema())
            .text(prompts::KEY_SYNTHESIS_INSTRUCTION);

        if !questions_text.trim().is_empty() {
            request = request.text(prompts::question_text_part(questions_text));
        }

        for file in question_files {
            request = request.inline(file.clone());
        }

        request
    }

    /// 根据题目生成标准答案
    ///
    /// # 参数
    /// - `questions_text`: 题目文本（可为空）
    /// - `question_files`: 已编码的题目文件（可为空）
    ///
    /// 两者至少提供一个，否则返回 `KeySynthesisError::EmptyInput`
    pub async fn synthesize(
        &self,
        questions_text: &str,
        question_files: &[EncodedFile],
    ) -> Result<AnswerKey, KeySynthesisError> {
        if questions_text.trim().is_empty() && question_files.is_empty() {
            return Err(KeySynthesisError::EmptyInput);
        }

        info!(
            "📝 正在生成标准答案（题目文本 {} 字符，题目文件 {} 个）...",
            questions_text.trim().chars().count(),
            question_files.len()
        );

        let request = Self::build_request(questions_text, question_files);

        let text = self.model.synthesize_key(&request).await.map_err(|e| {
            error!("标准答案生成失败: {}", e);
            KeySynthesisError::Remote(e)
        })?;

        if text.trim().is_empty() {
            error!("标准答案生成失败: 模型没有返回内容");
            return Err(KeySynthesisError::EmptyResponse);
        }

        let key: AnswerKey = serde_json::from_str(&text).map_err(|e| {
            error!("标准答案解析失败: {}", e);
            debug!("原始响应: {}", truncate_text(&text, 500));
            KeySynthesisError::Parse(e)
        })?;

        let duplicates = key.duplicate_question_numbers();
        if !duplicates.is_empty() {
            warn!("⚠️ 标准答案中存在重复题号: {:?}", duplicates);
        }

        info!(
            "✓ 标准答案生成完成: {} 道题，满分 {}",
            key.len(),
            key.total_marks()
        );

        Ok(key)
    }
}
