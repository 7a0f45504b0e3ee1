use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::quiz::{QuizRequest, QuizResult};
use crate::orchestrator::QuizService;
use crate::utils::logging::log_startup;

/// 应用主结构
///
/// 持有配置和共享的测验服务；服务内部的 LLM 客户端可被多个请求并发使用
#[derive(Clone, Debug)]
pub struct App {
    config: Config,
    service: Arc<QuizService>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        log_startup(&config);

        let service = Arc::new(QuizService::from_config(&config));

        Self { config, service }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<QuizService> {
        Arc::clone(&self.service)
    }

    /// 生成一份测验
    pub async fn run(&self, request: QuizRequest) -> AppResult<QuizResult> {
        self.service.create_quiz(request).await
    }
}
