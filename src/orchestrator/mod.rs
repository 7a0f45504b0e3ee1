//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责单次测验请求的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `quiz_service` - 测验服务
//! - 校验请求参数
//! - 选择题型序列
//! - 控制整体超时
//! - 把生成阶段的错误归一为"测验生成失败"
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::QuizService (处理 QuizRequest)
//!     ↓
//! workflow::QuizComposer (处理题型序列)
//!     ↓
//! services (能力层：type_selector / question_generator / llm)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → workflow → services
//! 2. **无跨请求状态**：去重上下文只活在单次请求内
//! 3. **无业务逻辑**：只做调度、超时和错误归一

pub mod quiz_service;

pub use quiz_service::{LlmQuestionSource, QuizService};
