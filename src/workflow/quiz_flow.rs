//! 测验组装流程 - 流程层
//!
//! 核心职责：把一串题型变成一份完整、已编号的测验
//!
//! 流程顺序（顺序模式）：
//! 1. 按题型序列逐题生成，每题都带上此前所有题干作为去重上下文
//! 2. 任意一题失败立即终止，不返回部分结果
//! 3. 全部成功后按序列顺序编号 1..N
//!
//! 状态：`Pending → Generating(1..N) → Assembled | Failed`

use futures::future::try_join_all;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::{Config, GenerationMode};
use crate::error::{AppResult, SchemaError};
use crate::models::question::{GeneratedQuestion, NumberedQuestion, QuestionType};
use crate::models::quiz::{QuizRequest, QuizResult};
use crate::services::prompts::avoid_window;
use crate::services::QuestionSource;
use crate::utils::logging::truncate_text;
use crate::workflow::generation_ctx::GenerationCtx;

/// 单次请求的组装状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposePhase {
    Pending,
    /// 正在生成第 n 题（从1开始）
    Generating(usize),
    Assembled,
    Failed,
}

impl ComposePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComposePhase::Assembled | ComposePhase::Failed)
    }
}

impl fmt::Display for ComposePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposePhase::Pending => f.write_str("Pending"),
            ComposePhase::Generating(n) => write!(f, "Generating({})", n),
            ComposePhase::Assembled => f.write_str("Assembled"),
            ComposePhase::Failed => f.write_str("Failed"),
        }
    }
}

/// 测验组装器
///
/// - 编排单题生成的顺序和去重上下文
/// - 不持有任何跨请求的可变状态
/// - 只依赖 [`QuestionSource`] 能力
pub struct QuizComposer<S> {
    source: S,
    mode: GenerationMode,
    max_avoid_context: usize,
}

impl<S: QuestionSource> QuizComposer<S> {
    /// 使用配置创建
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_mode(source, config.generation_mode, config.max_avoid_context)
    }

    pub fn with_mode(source: S, mode: GenerationMode, max_avoid_context: usize) -> Self {
        Self {
            source,
            mode,
            max_avoid_context,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    /// 按给定题型序列组装测验
    pub async fn compose(
        &self,
        request: &QuizRequest,
        types: &[QuestionType],
    ) -> AppResult<QuizResult> {
        info!(
            "开始组装测验: 主题={}, 难度={}, 题型={:?}, 模式={}",
            truncate_text(&request.topic, 40),
            request.difficulty_level,
            types,
            self.mode
        );

        let questions = match self.mode {
            GenerationMode::Sequential => self.generate_sequential(request, types).await?,
            GenerationMode::Concurrent => self.generate_concurrent(request, types).await?,
        };

        Ok(assemble(request, questions))
    }

    async fn generate_sequential(
        &self,
        request: &QuizRequest,
        types: &[QuestionType],
    ) -> AppResult<Vec<GeneratedQuestion>> {
        let total = types.len();
        let mut phase = ComposePhase::Pending;
        let mut questions = Vec::with_capacity(total);
        let mut seen: Vec<String> = Vec::with_capacity(total);

        for (index, kind) in types.iter().copied().enumerate() {
            let position = index + 1;
            transition(&mut phase, ComposePhase::Generating(position));

            let ctx = GenerationCtx::new(
                request,
                kind,
                position,
                total,
                avoid_window(&seen, self.max_avoid_context),
            );

            let question = match self.generate_checked(&ctx).await {
                Ok(question) => question,
                Err(e) => {
                    transition(&mut phase, ComposePhase::Failed);
                    warn!("{} 生成失败，放弃整份测验: {}", ctx, e);
                    return Err(e);
                }
            };

            info!(
                "{} ✓ 生成完成: {}",
                ctx,
                truncate_text(question.question_text(), 60)
            );
            seen.push(question.question_text().to_string());
            questions.push(question);
        }

        transition(&mut phase, ComposePhase::Assembled);
        Ok(questions)
    }

    /// 并发模式：所有题同时生成，不做跨题去重
    async fn generate_concurrent(
        &self,
        request: &QuizRequest,
        types: &[QuestionType],
    ) -> AppResult<Vec<GeneratedQuestion>> {
        let total = types.len();
        let tasks = types.iter().copied().enumerate().map(|(index, kind)| {
            let ctx = GenerationCtx::new(request, kind, index + 1, total, Vec::new());
            async move { self.generate_checked(&ctx).await }
        });

        // try_join_all 保持输入顺序，任一失败即整体失败
        try_join_all(tasks).await.inspect_err(|e| {
            warn!("并发生成失败，放弃整份测验: {}", e);
        })
    }

    /// 生成一题并确认题型与请求一致
    async fn generate_checked(&self, ctx: &GenerationCtx) -> AppResult<GeneratedQuestion> {
        let question = self.source.generate(ctx).await?;
        let actual = question.question_type();
        if actual != ctx.kind {
            return Err(SchemaError::TypeMismatch {
                expected: ctx.kind,
                actual,
            }
            .into());
        }
        Ok(question)
    }
}

/// 终态之后不允许再迁移
fn transition(phase: &mut ComposePhase, next: ComposePhase) {
    debug_assert!(
        !phase.is_terminal(),
        "组装状态 {} 已结束，不能迁移到 {}",
        phase,
        next
    );
    debug!("组装状态: {} → {}", phase, next);
    *phase = next;
}

/// 按序列顺序编号
fn assemble(request: &QuizRequest, questions: Vec<GeneratedQuestion>) -> QuizResult {
    let questions = questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| NumberedQuestion {
            question_number: index + 1,
            question,
        })
        .collect();

    QuizResult {
        topic: request.topic.clone(),
        difficulty_level: request.difficulty_level,
        questions,
    }
}
