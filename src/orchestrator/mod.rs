//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和运行阶段调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 持有模型客户端和计时器
//! - 答案阶段：读取或生成标准答案
//! - 批改阶段：收集答卷并交给 batch_processor
//! - 报表阶段：导出 CSV、汇总、核对、写入警告
//!
//! ### `batch_processor` - 批量答卷处理器
//! - 顺序批改，答卷之间固定冷却
//! - 通过通道上报进度
//! - 输出与输入一一对应
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行)
//!     ↓
//! batch_processor (处理 Vec<答卷>)
//!     ↓
//! workflow::SubmissionFlow (处理单份答卷)
//!     ↓
//! services (能力层：encode / grade / report / warn)
//!     ↓
//! clients + infrastructure (模型调用、计时)
//! ```

pub mod app;
pub mod batch_processor;

// 重新导出主要类型
pub use app::{App, RunOutcome, RunPlan};
pub use batch_processor::{BatchProcessor, GradingProgress};
