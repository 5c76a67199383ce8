/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 输出
///
/// RUST_LOG 优先，其次由 `verbose` 决定 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n答卷批改日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `model_name`: 使用的模型
/// - `cooldown_ms`: 答卷间冷却时间
pub fn log_startup(model_name: &str, cooldown_ms: u64) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 答卷顺序批改模式");
    info!("🤖 模型: {}", model_name);
    info!("⏱️ 答卷间冷却: {} ms", cooldown_ms);
    info!("{}", "=".repeat(60));
}

/// 记录答卷加载信息
///
/// # 参数
/// - `total`: 答卷总数
pub fn log_booklets_loaded(total: usize) {
    info!("✓ 找到 {} 份待批改的答卷", total);
    info!("💡 按顺序逐份批改，每份之间保持冷却\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `graded`: 批改成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `report_path`: 报表路径
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    graded: usize,
    failed: usize,
    total: usize,
    report_path: &str,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部批改完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", graded, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n报表已保存至: {}", report_path);
    info!("日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
