//! # Booklet Review
//!
//! 一个用于批改学生答卷的 Rust 应用程序：
//! 根据题目生成带评分细则的标准答案，逐份调用多模态模型批改答卷，导出 CSV 报表
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `clients/` - `GradingModel` 模型调用能力，`GeminiClient` 为唯一的 HTTP 实现
//! - `infrastructure/` - `Sleeper` 计时等待能力，退避与冷却都经由它完成
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文件或单份结果
//! - `payload_encoder` - 文件编码能力
//! - `KeySynthesizer` - 标准答案生成能力
//! - `SubmissionGrader` - 单份答卷批改能力（含重试）
//! - `report_generator` - CSV 报表、汇总、总分核对
//! - `WarnWriter` - 写 warn.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一份答卷"的完整处理流程
//! - `SubmissionCtx` - 上下文封装（序号 + 文件名）
//! - `SubmissionFlow` - 流程编排（encode → grade）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用生命周期，管理资源和运行阶段
//! - `orchestrator/batch_processor` - 顺序批改、冷却、进度上报
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{GeminiClient, GradingModel};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnswerKey, StudentResult};
pub use orchestrator::{App, RunOutcome, RunPlan};
pub use workflow::{SubmissionCtx, SubmissionFlow};
