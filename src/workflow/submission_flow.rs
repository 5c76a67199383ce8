//! 答卷处理流程 - 流程层
//!
//! 核心职责：定义"一份答卷"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取并编码文件
//! 2. 编码失败 → 读取失败的哨兵结果（不调用批改服务）
//! 3. 编码成功 → 批改服务（内部自带重试与兜底）

use tracing::{error, info};

use crate::models::result::REMARK_FILE_READ_ERROR;
use crate::models::{AnswerKey, StudentResult};
use crate::services::payload_encoder::encode_file;
use crate::services::SubmissionGrader;
use crate::workflow::submission_ctx::SubmissionCtx;

/// 答卷处理流程
///
/// - 编排单份答卷的编码与批改
/// - 不持有任何资源
/// - 不关心冷却与批次顺序
pub struct SubmissionFlow<'a> {
    grader: &'a SubmissionGrader,
}

impl<'a> SubmissionFlow<'a> {
    /// 创建新的答卷处理流程
    pub fn new(grader: &'a SubmissionGrader) -> Self {
        Self { grader }
    }

    /// 处理一份答卷，永远返回一个结果
    pub async fn run(&self, ctx: &SubmissionCtx, answer_key: &AnswerKey) -> StudentResult {
        info!("{} 📄 读取答卷...", ctx);

        let encoded = match encode_file(&ctx.path).await {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("{} ❌ 文件读取失败: {}", ctx, e);
                return StudentResult::failed(&ctx.file_name, REMARK_FILE_READ_ERROR);
            }
        };

        info!("{} 🔍 正在批改 ({})...", ctx, encoded.mime_type);
        let result = self.grader.grade(&encoded, answer_key).await;

        if result.is_failed() {
            error!(
                "{} ❌ 批改失败: {}",
                ctx,
                result
                    .evaluations
                    .first()
                    .map(|e| e.remark.as_str())
                    .unwrap_or_default()
            );
        } else {
            info!(
                "{} ✓ 批改完成: {} | {} 道题 | 得分 {}/{}",
                ctx,
                result.student_id,
                result.evaluations.len(),
                result.total_obtained(),
                result.total_available()
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ScriptedModel;
    use crate::infrastructure::RecordingSleeper;
    use crate::models::answer_key::item;
    use crate::services::RetryPolicy;
    use std::path::Path;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unreadable_file_skips_grader() {
        let model = Arc::new(ScriptedModel::new());
        let grader = SubmissionGrader::new(
            model.clone(),
            Arc::new(RecordingSleeper::new()),
            RetryPolicy::default(),
        );
        let ctx = SubmissionCtx::new(Path::new("/missing/dir/bob.pdf"), 1, 1);
        let key = AnswerKey::new(vec![item(1, &[("a", 1.0)])]);

        let result = SubmissionFlow::new(&grader).run(&ctx, &key).await;

        assert_eq!(model.grade_calls(), 0);
        assert_eq!(result.student_id, "bob.pdf");
        assert_eq!(result.evaluations[0].remark, REMARK_FILE_READ_ERROR);
    }

    #[tokio::test]
    async fn test_readable_file_is_graded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carol.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let model = Arc::new(ScriptedModel::new());
        model.push_grade(Ok(
            r#"{"student_id": "Carol", "evaluations": []}"#.to_string()
        ));
        let grader = SubmissionGrader::new(
            model.clone(),
            Arc::new(RecordingSleeper::new()),
            RetryPolicy::default(),
        );
        let ctx = SubmissionCtx::new(&path, 1, 1);

        let result = SubmissionFlow::new(&grader)
            .run(&ctx, &AnswerKey::default())
            .await;

        assert_eq!(model.grade_calls(), 1);
        assert_eq!(result.student_id, "Carol");
        assert!(result.evaluations.is_empty());
    }
}
