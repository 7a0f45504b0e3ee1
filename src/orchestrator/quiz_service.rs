//! 测验服务 - 编排层
//!
//! ## 职责
//!
//! 本模块是对外的唯一入口 `create_quiz`，负责一次请求的完整生命周期。
//!
//! ## 核心功能
//!
//! 1. **参数校验**：非法请求在发起任何 LLM 调用前直接拒绝
//! 2. **题型选择**：调用题型选择器得到题型序列
//! 3. **流程调度**：委托 `QuizComposer` 生成并组装
//! 4. **超时控制**：整个请求超时即取消进行中的调用
//! 5. **错误归一**：生成阶段的任何错误统一为"测验生成失败"，原因只写日志

use rand::Rng;
use std::time::{Duration, Instant};
use tracing::error;

use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::question::QuestionType;
use crate::models::quiz::{QuizRequest, QuizResult};
use crate::services::{
    random_question_types, select_question_types, LlmService, QuestionGenerator, QuestionSource,
    QUESTION_COUNT,
};
use crate::utils::logging::{log_quiz_complete, log_quiz_start};
use crate::workflow::QuizComposer;

/// 生产环境使用的题目来源
pub type LlmQuestionSource = QuestionGenerator<LlmService>;

/// 测验服务
///
/// 不持有跨请求的可变状态，可以放进 `Arc` 供多个请求并发使用
pub struct QuizService<S = LlmQuestionSource> {
    composer: QuizComposer<S>,
    request_timeout: Duration,
}

impl QuizService<LlmQuestionSource> {
    /// 按配置创建基于 LLM 的服务
    pub fn from_config(config: &Config) -> Self {
        let generator = QuestionGenerator::new(LlmService::new(config));
        Self::new(
            QuizComposer::new(generator, config),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

impl<S: QuestionSource> QuizService<S> {
    pub fn new(composer: QuizComposer<S>, request_timeout: Duration) -> Self {
        Self {
            composer,
            request_timeout,
        }
    }

    pub fn composer(&self) -> &QuizComposer<S> {
        &self.composer
    }

    /// 生成一份测验
    pub async fn create_quiz(&self, request: QuizRequest) -> AppResult<QuizResult> {
        request.validate()?;
        let types = random_question_types();
        self.run(&request, &types).await
    }

    /// 使用指定随机源选题型后生成
    pub async fn create_quiz_with_rng<R: Rng + ?Sized>(
        &self,
        request: QuizRequest,
        rng: &mut R,
    ) -> AppResult<QuizResult> {
        request.validate()?;
        let types = select_question_types(rng, QUESTION_COUNT);
        self.run(&request, &types).await
    }

    /// 按指定题型序列生成
    ///
    /// 序列中简答题超过一道时直接拒绝
    pub async fn create_quiz_with_types(
        &self,
        request: QuizRequest,
        types: &[QuestionType],
    ) -> AppResult<QuizResult> {
        request.validate()?;
        let count = types
            .iter()
            .filter(|t| **t == QuestionType::ShortAnswer)
            .count();
        if count > 1 {
            return Err(ValidationError::TooManyShortAnswers { count }.into());
        }
        self.run(&request, types).await
    }

    async fn run(&self, request: &QuizRequest, types: &[QuestionType]) -> AppResult<QuizResult> {
        log_quiz_start(request, types);
        let started = Instant::now();

        // 超时后 compose 的 future 被丢弃，进行中的调用随之取消
        let outcome = tokio::time::timeout(self.request_timeout, self.composer.compose(request, types))
            .await
            .unwrap_or_else(|_| {
                Err(AppError::RequestTimeout {
                    timeout_secs: self.request_timeout.as_secs(),
                })
            });

        match outcome {
            Ok(result) => {
                log_quiz_complete(&result, started.elapsed());
                Ok(result)
            }
            Err(cause) => {
                error!(
                    "❌ 测验生成失败 (主题: {}, 耗时: {:?}): {}",
                    request.topic,
                    started.elapsed(),
                    cause
                );
                Err(AppError::generation_failed(cause))
            }
        }
    }
}

impl<S> std::fmt::Debug for QuizService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizService")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
