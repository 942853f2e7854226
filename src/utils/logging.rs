//! 日志工具模块
//!
//! 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 表单自动填写工具启动");
    info!("🤖 模型: {}", config.llm_model_name);
    info!(
        "📚 检索服务: {}",
        config.retrieval_base_url.as_deref().unwrap_or("未配置")
    );
    info!(
        "💬 补充提问: {}",
        if config.gap_resolution { "开启" } else { "关闭" }
    );
    info!("{}", "=".repeat(60));
}

/// 记录阶段开始
pub fn log_stage(stage: &str) {
    info!("\n{}", "─".repeat(60));
    info!("⏳ {}...", stage);
}

/// 记录阶段成功
pub fn log_stage_done(stage: &str) {
    info!("✓ {}...成功", stage);
}

/// 打印最终结果
///
/// # 参数
/// - `answered`: 已回答字段数
/// - `total`: 字段总数
/// - `url`: 预填链接
pub fn print_final_result(answered: usize, total: usize, url: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 填写完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 已回答: {}/{}", answered, total);
    info!("❔ 未回答: {}", total - answered);
    info!("{}", "=".repeat(60));
    info!("🔗 预填链接: {}", url);
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
        text.chars().take(max_len).collect::<String>() + "... [日志已截断]"
    } else {
        text.to_string()
    }
}
