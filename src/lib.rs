//! # Quiz Composer
//!
//! 根据主题和难度，调用 LLM 生成一份由三种题型组成的测验
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单道题
//! - `LlmService` - 调用兼容 OpenAI 的接口（JSON 模式）
//! - `QuestionGenerator` - 按题型拼提示词并校验返回结构
//! - `type_selector` - 题型选择（每套最多一道简答题）
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一份测验"的组装流程
//! - `GenerationCtx` - 单题上下文（主题 + 难度 + 去重题干）
//! - `QuizComposer` - 逐题生成、去重、编号，失败则整体失败
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/quiz_service` - 对外入口，负责校验、超时和错误归一
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, GenerationMode};
pub use error::{AppError, AppResult};
pub use models::{
    GeneratedQuestion, NumberedQuestion, QuestionType, QuizRequest, QuizResult,
    DEFAULT_DIFFICULTY,
};
pub use orchestrator::QuizService;
pub use services::{ChatBackend, QuestionGenerator, QuestionSource};
pub use utils::logging;
pub use workflow::{GenerationCtx, QuizComposer};
