//! 应用生命周期 - 编排层
//!
//! 一次运行分三个阶段：
//!
//! 1. **答案阶段**：读取已有标准答案，或根据题目生成（失败即终止）
//! 2. **批改阶段**：收集答卷，交给 `BatchProcessor` 顺序批改
//! 3. **报表阶段**：导出 CSV、汇总、核对总分、写入警告
//!
//! 只有本模块持有模型客户端和计时器等资源

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::clients::{GeminiClient, GradingModel};
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::{Sleeper, TokioSleeper};
use crate::models::{load_answer_key, save_answer_key, scan_booklets, AnswerKey, StudentResult};
use crate::orchestrator::batch_processor::{BatchProcessor, GradingProgress};
use crate::services::payload_encoder::encode_file;
use crate::services::{
    audit_totals, generate_csv, summarize, KeySynthesizer, ReportSummary, RetryPolicy,
    SubmissionGrader, TotalMismatch, WarnWriter,
};
use crate::utils::logging::{init_log_file, log_booklets_loaded, log_startup, print_final_stats};

/// 一次运行的输入
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    /// 题目文本（可为空）
    pub questions_text: String,
    /// 题目文件
    pub question_files: Vec<PathBuf>,
    /// 已有的标准答案文件
    pub answer_key: Option<PathBuf>,
    /// 生成的标准答案保存路径
    pub save_answer_key: Option<PathBuf>,
    /// 按给定顺序批改的答卷
    pub students: Vec<PathBuf>,
    /// 答卷目录
    pub students_dir: Option<PathBuf>,
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub answer_key: AnswerKey,
    pub results: Vec<StudentResult>,
    pub summary: ReportSummary,
    pub mismatches: Vec<TotalMismatch>,
    /// 导出的 CSV 内容
    pub report: String,
}

/// 应用主结构
pub struct App {
    config: Config,
    plan: RunPlan,
    model: Arc<dyn GradingModel>,
    sleeper: Arc<dyn Sleeper>,
}

impl App {
    /// 初始化应用
    ///
    /// 写入日志文件头并创建 Gemini 客户端
    pub fn initialize(config: Config, plan: RunPlan) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config.llm_model_name, config.cooldown_ms);

        let client = GeminiClient::new(&config).context("无法创建模型客户端")?;

        Ok(Self::with_components(
            config,
            plan,
            Arc::new(client),
            Arc::new(TokioSleeper),
        ))
    }

    /// 使用指定的模型和计时器创建应用
    pub fn with_components(
        config: Config,
        plan: RunPlan,
        model: Arc<dyn GradingModel>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            plan,
            model,
            sleeper,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunOutcome> {
        let answer_key = self.prepare_answer_key().await?;

        let booklets = self.collect_booklets().await?;
        if booklets.is_empty() {
            warn!("⚠️ 没有找到待批改的答卷，报表将只有表头");
        }
        log_booklets_loaded(booklets.len());

        let results = self.grade_all(&booklets, &answer_key).await;

        let report = generate_csv(&results, &answer_key);
        tokio::fs::write(&self.config.output_report_file, &report)
            .await
            .map_err(|e| AppError::file_write_failed(&self.config.output_report_file, e))?;

        let summary = summarize(&results);
        log_summary(&summary);

        let mismatches = audit_totals(&results, &answer_key);
        self.write_warnings(&results, &mismatches);

        print_final_stats(
            summary.graded(),
            summary.failed,
            summary.students,
            &self.config.output_report_file,
            &self.config.output_log_file,
        );

        Ok(RunOutcome {
            answer_key,
            results,
            summary,
            mismatches,
            report,
        })
    }

    /// 答案阶段：读取或生成标准答案
    async fn prepare_answer_key(&self) -> Result<AnswerKey> {
        if let Some(path) = &self.plan.answer_key {
            info!("📂 读取标准答案: {}", path.display());
            let key = load_answer_key(path).await?;
            info!("✓ 标准答案共 {} 题，总分 {}", key.len(), key.total_marks());
            return Ok(key);
        }

        let mut question_files = Vec::with_capacity(self.plan.question_files.len());
        for path in &self.plan.question_files {
            question_files.push(encode_file(path).await?);
        }

        let synthesizer = KeySynthesizer::new(self.model.clone());
        let key = synthesizer
            .synthesize(&self.plan.questions_text, &question_files)
            .await
            .context("标准答案生成失败，无法继续批改")?;

        if let Some(path) = &self.plan.save_answer_key {
            save_answer_key(&key, path).await?;
            info!("💾 标准答案已保存至: {}", path.display());
        }

        Ok(key)
    }

    /// 收集答卷：先按给定顺序，再追加目录中的文件
    async fn collect_booklets(&self) -> Result<Vec<PathBuf>> {
        let mut booklets = self.plan.students.clone();

        if let Some(dir) = &self.plan.students_dir {
            info!("\n📁 正在扫描答卷目录: {}", dir.display());
            booklets.extend(scan_booklets(dir).await?);
        }

        Ok(booklets)
    }

    /// 批改阶段
    async fn grade_all(&self, booklets: &[PathBuf], answer_key: &AnswerKey) -> Vec<StudentResult> {
        let (tx, mut rx) = mpsc::unbounded_channel::<GradingProgress>();

        let progress_logger = tokio::spawn(async move {
            while let Some(progress) = rx.recv().await {
                if progress.current > 0 {
                    info!("📈 批改进度: {}/{}", progress.current, progress.total);
                }
            }
        });

        let grader = SubmissionGrader::new(
            self.model.clone(),
            self.sleeper.clone(),
            RetryPolicy::from_config(&self.config),
        );
        let processor = BatchProcessor::new(grader, self.sleeper.clone(), self.config.cooldown())
            .with_progress(tx);

        let results = processor.process_all(booklets, answer_key).await;

        // 关闭发送端，等待进度日志输出完毕
        drop(processor);
        let _ = progress_logger.await;

        results
    }

    /// 报表阶段：失败的答卷和分数不自洽的题目写入警告文件
    fn write_warnings(&self, results: &[StudentResult], mismatches: &[TotalMismatch]) {
        let writer = WarnWriter::with_path(&self.config.warn_file);

        for result in results.iter().filter(|r| r.is_failed()) {
            let remark = result
                .evaluations
                .first()
                .map(|e| e.remark.as_str())
                .unwrap_or_default();
            if let Err(e) = writer.write(&result.student_id, remark) {
                warn!("写入 {} 失败: {}", writer.path(), e);
            }
        }

        for mismatch in mismatches {
            warn!("⚠️ 分数不一致: {}", mismatch);
            if let Err(e) = writer.write(&mismatch.student_id, &mismatch.to_string()) {
                warn!("写入 {} 失败: {}", writer.path(), e);
            }
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_summary(summary: &ReportSummary) {
    info!("\n{}", "─".repeat(60));
    info!(
        "📋 批改汇总: {} 名学生 | {} 份失败 | 报表 {} 行",
        summary.students, summary.failed, summary.rows
    );
    for student in &summary.per_student {
        if student.failed {
            info!("  ✗ {} | 未能批改", student.student_id);
        } else {
            info!(
                "  ✓ {} | {}/{}",
                student.student_id, student.obtained, student.available
            );
        }
    }
    info!("{}", "─".repeat(60));
}
