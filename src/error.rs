use thiserror::Error;

use crate::models::question::QuestionType;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（启动阶段致命）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 请求参数校验错误
    #[error("请求校验失败: {0}")]
    Validation(#[from] ValidationError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// LLM 返回内容不符合题型结构
    #[error("结构校验失败: {0}")]
    Schema(#[from] SchemaError),
    /// 整个请求超时
    #[error("请求超时 ({timeout_secs}秒)")]
    RequestTimeout { timeout_secs: u64 },
    /// 测验生成失败
    ///
    /// 对调用方只暴露这一条信息，底层原因保留在 `source()` 中用于日志诊断
    #[error("测验生成失败")]
    QuizGenerationFailed {
        #[source]
        cause: Box<AppError>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("缺少 LLM API 密钥，请设置环境变量 {var_name}")]
    MissingApiKey { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 取值非法: {reason}")]
    InvalidValue { field: String, reason: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 请求参数校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 主题为空
    #[error("主题不能为空")]
    EmptyTopic,
    /// 难度超出范围
    #[error("难度 {value} 超出范围 [{min}, {max}]")]
    DifficultyOutOfRange { value: i64, min: u8, max: u8 },
    /// 题型序列中简答题超过一道
    #[error("简答题最多一道，实际为 {count}")]
    TooManyShortAnswers { count: usize },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建 LLM 请求失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 调用超时
    #[error("LLM API调用超时 (模型: {model}, {timeout_secs}秒)")]
    Timeout { model: String, timeout_secs: u64 },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回内容不是 JSON 对象
    #[error("LLM返回内容无法解析为JSON对象 (响应: {response}): {source}")]
    JsonParseFailed {
        response: String,
        #[source]
        source: serde_json::Error,
    },
}

/// LLM 返回的 JSON 不符合题型结构
#[derive(Debug, Error)]
pub enum SchemaError {
    /// 字段缺失或类型不符
    #[error("{kind} 题目字段不合法: {source}")]
    InvalidFields {
        kind: QuestionType,
        #[source]
        source: serde_json::Error,
    },
    /// 题干为空
    #[error("{kind} 题目题干为空")]
    EmptyQuestion { kind: QuestionType },
    /// 答案为空
    #[error("{kind} 题目答案为空")]
    EmptyAnswer { kind: QuestionType },
    /// 选项数量不对
    #[error("选择题选项数量应为 {expected}，实际为 {actual}")]
    OptionCount { expected: usize, actual: usize },
    /// 答案不在选项中
    #[error("选择题答案 '{answer}' 不在选项中")]
    AnswerNotInOptions { answer: String },
    /// 返回的题型与请求的不一致
    #[error("请求的题型为 {expected}，实际返回 {actual}")]
    TypeMismatch {
        expected: QuestionType,
        actual: QuestionType,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 LLM API 调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建请求构建错误
    pub fn llm_request_build_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Llm(LlmError::RequestBuildFailed {
            source: Box::new(source),
        })
    }

    /// 把任意生成阶段的错误包装成统一的"测验生成失败"
    pub fn generation_failed(cause: AppError) -> Self {
        match cause {
            already @ AppError::QuizGenerationFailed { .. } => already,
            other => AppError::QuizGenerationFailed {
                cause: Box::new(other),
            },
        }
    }

    /// 面向最终用户的错误信息
    ///
    /// 配置和校验错误原样给出，生成阶段的错误只给出统一文案，
    /// 底层原因（模型名、原始响应等）只进日志
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(_)
            | AppError::Validation(_)
            | AppError::QuizGenerationFailed { .. } => self.to_string(),
            _ => "测验生成失败".to_string(),
        }
    }

    /// 是否为调用方输入错误（未发起任何 LLM 调用）
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
