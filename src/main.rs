use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use quiz_composer::{logging, App, Config, QuizRequest, DEFAULT_DIFFICULTY};

/// 根据主题和难度生成一份 3 道题的测验，以 JSON 输出
#[derive(Debug, Parser)]
#[command(name = "quiz_composer", version, about)]
struct Cli {
    /// 测验主题
    #[arg(short, long)]
    topic: String,

    /// 难度 (1-10)
    #[arg(short, long, default_value_t = i64::from(DEFAULT_DIFFICULTY))]
    difficulty: i64,

    /// TOML 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };
    logging::init(config.verbose_logging);

    let app = App::initialize(config);
    let request = QuizRequest::new(cli.topic, cli.difficulty);

    match app.run(request).await {
        Ok(quiz) => {
            let json = serde_json::to_string_pretty(&quiz).context("序列化测验失败")?;
            println!("{}", json);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            // 原因链已由服务层写入日志，这里只给统一文案
            eprintln!("{}", err.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
