//! 题目生成服务 - 业务能力层
//!
//! 只负责"按题型生成一道题"的能力：拼提示词 → 调 LLM → 解析校验
//!
//! - 不出现 Vec<GeneratedQuestion>
//! - 不关心题目顺序和编号
//! - 失败不重试，直接向上返回

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::question::{GeneratedQuestion, QuestionType};
use crate::services::llm_service::ChatBackend;
use crate::services::{prompts, response_parser};
use crate::utils::logging::truncate_text;
use crate::workflow::GenerationCtx;

/// 单题生成能力
///
/// 编排层只依赖这个 trait，测试中可以直接替换成记录上下文的假实现
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, ctx: &GenerationCtx) -> AppResult<GeneratedQuestion>;
}

/// 基于 LLM 的题目生成器
pub struct QuestionGenerator<B> {
    backend: B,
}

impl<B: ChatBackend> QuestionGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 生成 O/X 题
    pub async fn generate_ox(&self, ctx: &GenerationCtx) -> AppResult<GeneratedQuestion> {
        self.generate_kind(QuestionType::Ox, ctx).await
    }

    /// 生成选择题
    pub async fn generate_multiple_choice(
        &self,
        ctx: &GenerationCtx,
    ) -> AppResult<GeneratedQuestion> {
        self.generate_kind(QuestionType::MultipleChoice, ctx).await
    }

    /// 生成简答题
    pub async fn generate_short_answer(
        &self,
        ctx: &GenerationCtx,
    ) -> AppResult<GeneratedQuestion> {
        self.generate_kind(QuestionType::ShortAnswer, ctx).await
    }

    async fn generate_kind(
        &self,
        kind: QuestionType,
        ctx: &GenerationCtx,
    ) -> AppResult<GeneratedQuestion> {
        let system_message = prompts::system_prompt(kind);
        let user_message = prompts::user_prompt(ctx);
        debug!("{} 提示词: {}", ctx, truncate_text(&user_message, 120));

        let response = self
            .backend
            .send_to_llm(&user_message, Some(system_message))
            .await?;

        response_parser::parse_question(kind, &response).inspect_err(|e| {
            warn!(
                "{} LLM 响应校验失败: {} (响应: {})",
                ctx,
                e,
                truncate_text(&response, 120)
            );
        })
    }
}

#[async_trait]
impl<B: ChatBackend> QuestionSource for QuestionGenerator<B> {
    async fn generate(&self, ctx: &GenerationCtx) -> AppResult<GeneratedQuestion> {
        match ctx.kind {
            QuestionType::Ox => self.generate_ox(ctx).await,
            QuestionType::MultipleChoice => self.generate_multiple_choice(ctx).await,
            QuestionType::ShortAnswer => self.generate_short_answer(ctx).await,
        }
    }
}
