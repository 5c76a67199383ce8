//! 批量答卷处理器 - 编排层
//!
//! ## 职责
//!
//! 按顺序逐份批改答卷，是唯一控制批次节奏的模块。
//!
//! ## 核心功能
//!
//! 1. **顺序处理**：同一时刻只有一份答卷在批改中
//! 2. **冷却控制**：相邻两份答卷之间固定等待，最后一份之后不等待
//! 3. **进度上报**：开始前上报 (0, N)，每份开始时上报 (i, N)
//! 4. **结果对齐**：输出与输入一一对应、顺序一致
//!
//! ## 设计特点
//!
//! - **不处理单份细节**：委托 `SubmissionFlow`
//! - **不抛错**：失败的答卷以哨兵结果占位

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::infrastructure::Sleeper;
use crate::models::{AnswerKey, StudentResult};
use crate::services::SubmissionGrader;
use crate::workflow::{SubmissionCtx, SubmissionFlow};

/// 批改进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingProgress {
    /// 当前正在批改第几份（从 1 开始，0 表示尚未开始）
    pub current: usize,
    pub total: usize,
}

/// 批量答卷处理器
pub struct BatchProcessor {
    grader: SubmissionGrader,
    sleeper: Arc<dyn Sleeper>,
    cooldown: Duration,
    progress: Option<UnboundedSender<GradingProgress>>,
}

impl BatchProcessor {
    pub fn new(grader: SubmissionGrader, sleeper: Arc<dyn Sleeper>, cooldown: Duration) -> Self {
        Self {
            grader,
            sleeper,
            cooldown,
            progress: None,
        }
    }

    /// 设置进度通道
    pub fn with_progress(mut self, sender: UnboundedSender<GradingProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// 按顺序批改所有答卷
    ///
    /// # 参数
    /// - `booklets`: 答卷路径，顺序即输出顺序
    /// - `answer_key`: 标准答案
    ///
    /// # 返回
    /// 与 `booklets` 一一对应的批改结果
    pub async fn process_all(
        &self,
        booklets: &[PathBuf],
        answer_key: &AnswerKey,
    ) -> Vec<StudentResult> {
        let total = booklets.len();
        let mut results = Vec::with_capacity(total);

        self.report_progress(0, total);

        let flow = SubmissionFlow::new(&self.grader);

        for (idx, path) in booklets.iter().enumerate() {
            let ctx = SubmissionCtx::new(path, idx + 1, total);
            self.report_progress(ctx.index, total);

            let result = flow.run(&ctx, answer_key).await;
            results.push(result);

            if !ctx.is_last() {
                debug!("{} ⏸️ 冷却 {:?}", ctx, self.cooldown);
                self.sleeper.sleep(self.cooldown).await;
            }
        }

        log_batch_complete(&results);
        results
    }

    fn report_progress(&self, current: usize, total: usize) {
        if let Some(sender) = &self.progress {
            // 接收端关闭不影响批改
            let _ = sender.send(GradingProgress { current, total });
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_batch_complete(results: &[StudentResult]) {
    let failed = results.iter().filter(|r| r.is_failed()).count();
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批次完成: 成功 {}/{}",
        results.len() - failed,
        results.len()
    );
    info!("{}", "─".repeat(60));
}
