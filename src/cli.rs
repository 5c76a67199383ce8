//! 命令行参数
//!
//! 只负责解析运行输入和覆盖输出路径，不做任何批改逻辑

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::orchestrator::RunPlan;

/// 答卷批改工具
///
/// 根据题目生成（或读取）标准答案，逐份批改学生答卷并导出 CSV 报表
#[derive(Parser, Debug, Default)]
#[command(name = "booklet-review")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 题目文本
    #[arg(long, value_name = "TEXT")]
    pub questions_text: Option<String>,

    /// 从文件读取题目文本
    #[arg(long, value_name = "PATH")]
    pub questions_text_file: Option<PathBuf>,

    /// 题目文件（PDF / 图片），可多次指定
    #[arg(long = "question-file", value_name = "PATH")]
    pub question_files: Vec<PathBuf>,

    /// 已有的标准答案（.json / .toml），指定后跳过答案生成
    #[arg(long, value_name = "PATH")]
    pub answer_key: Option<PathBuf>,

    /// 将生成的标准答案保存到该路径
    #[arg(long, value_name = "PATH")]
    pub save_answer_key: Option<PathBuf>,

    /// 学生答卷，可多次指定，按给定顺序批改
    #[arg(long = "student", value_name = "PATH")]
    pub students: Vec<PathBuf>,

    /// 答卷目录，其中的 pdf/png/jpg/jpeg 文件按文件名排序后追加
    #[arg(long, value_name = "DIR")]
    pub students_dir: Option<PathBuf>,

    /// CSV 报表输出路径
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 用命令行参数覆盖配置
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output_report_file = output.clone();
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }

    /// 转换为运行计划
    ///
    /// 题目文本与题目文本文件会拼接在一起
    pub fn into_plan(self) -> AppResult<RunPlan> {
        let mut questions_text = self.questions_text.unwrap_or_default();

        if let Some(path) = &self.questions_text_file {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::file_read_failed(path, e))?;
            if !questions_text.trim().is_empty() {
                questions_text.push_str("\n\n");
            }
            questions_text.push_str(&content);
        }

        Ok(RunPlan {
            questions_text,
            question_files: self.question_files,
            answer_key: self.answer_key,
            save_answer_key: self.save_answer_key,
            students: self.students,
            students_dir: self.students_dir,
        })
    }
}
