/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::BatchReport;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 info 或 debug 级别。
/// 重复调用是安全的（测试中会多次调用）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录阶段启动信息
///
/// # 参数
/// - `stage`: 阶段名
/// - `max_concurrent`: 最大并发数
pub fn log_stage_start(stage: &str, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始{}阶段", stage);
    info!("📊 最大并发数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录工作项加载信息
pub fn log_items_loaded(stage: &str, total: usize) {
    info!("✓ {}阶段找到 {} 个待处理项", stage, total);
}

/// 打印阶段最终统计
pub fn print_final_stats(report: &BatchReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 {}阶段完成统计", report.stage);
    info!(
        "完成时间: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}", report.counts.succeeded);
    info!("⏭️ 跳过: {}", report.counts.skipped);
    info!("❌ 失败: {}", report.counts.failed);
    info!("📦 总计: {}", report.counts.total);
    for failure in report.failures() {
        info!("   ❌ #{} {}", failure.index, failure.label);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
