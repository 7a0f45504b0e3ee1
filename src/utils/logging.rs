//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::question::QuestionType;
use crate::models::quiz::{QuizRequest, QuizResult};

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则 verbose 时为 debug，默认 info。
/// 重复调用是安全的（测试中可能多次初始化）
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

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 测验生成启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🤖 模型: {} ({})", config.llm_model_name, config.llm_api_base_url);
    info!(
        "📋 生成模式: {}, 单题超时: {}秒, 请求超时: {}秒",
        config.generation_mode, config.llm_timeout_secs, config.request_timeout_secs
    );
    info!("{}", "=".repeat(60));
}

/// 记录测验开始信息
pub fn log_quiz_start(request: &QuizRequest, types: &[QuestionType]) {
    info!("\n{}", "─".repeat(60));
    info!(
        "📝 主题: {} | 难度: {}",
        truncate_text(&request.topic, 60),
        request.difficulty_level
    );
    let labels: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
    info!("🎲 题型序列: [{}]", labels.join(", "));
}

/// 记录测验完成信息
pub fn log_quiz_complete(result: &QuizResult, elapsed: Duration) {
    info!(
        "✅ 测验生成完成: {} 道题, 耗时 {:.1}秒",
        result.questions.len(),
        elapsed.as_secs_f64()
    );
    for q in &result.questions {
        debug!(
            "  {}. [{}] {}",
            q.question_number,
            q.question.question_type(),
            truncate_text(q.question.question_text(), 80)
        );
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("조선시대", 10), "조선시대");
        assert_eq!(truncate_text("조선시대 역사", 4), "조선시대...");
        assert_eq!(truncate_text("", 3), "");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
    }
}
