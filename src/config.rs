use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppResult, ConfigError};
use crate::services::type_selector::QUESTION_COUNT;

/// 生成模式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// 逐题生成，后一题能看到前面所有题干（默认）
    Sequential,
    /// 所有题同时生成，不做跨题去重
    Concurrent,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(GenerationMode::Sequential),
            "concurrent" => Ok(GenerationMode::Concurrent),
            other => Err(format!("未知的生成模式: {}", other)),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Sequential => f.write_str("sequential"),
            GenerationMode::Concurrent => f.write_str("concurrent"),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    /// 单次 LLM 调用超时（秒）
    pub llm_timeout_secs: u64,
    // --- 测验生成配置 ---
    /// 整个请求的超时（秒）
    pub request_timeout_secs: u64,
    pub generation_mode: GenerationMode,
    /// 去重上下文最多保留的题干条数
    pub max_avoid_context: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4-turbo".to_string(),
            llm_temperature: 0.7,
            llm_max_tokens: 1024,
            llm_timeout_secs: 60,
            request_timeout_secs: 180,
            generation_mode: GenerationMode::Sequential,
            max_avoid_context: 10,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    llm_temperature: Option<f32>,
    llm_max_tokens: Option<u32>,
    llm_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    generation_mode: Option<GenerationMode>,
    max_avoid_context: Option<usize>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 < 配置文件 < 环境变量
    ///
    /// 缺少 API 密钥时返回错误，应在启动阶段直接退出
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path {
            config.merge_file(path)?;
        }

        config.merge_vars(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 只从环境变量加载
    pub fn from_env() -> AppResult<Self> {
        Self::load(None)
    }

    /// 合并 TOML 配置文件
    pub fn merge_file(&mut self, path: &Path) -> AppResult<()> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        self.merge_toml(&content, &path.display().to_string())
    }

    fn merge_toml(&mut self, content: &str, path: &str) -> AppResult<()> {
        let file: FileConfig =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_string(),
                source,
            })?;

        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.llm_temperature {
            self.llm_temperature = v;
        }
        if let Some(v) = file.llm_max_tokens {
            self.llm_max_tokens = v;
        }
        if let Some(v) = file.llm_timeout_secs {
            self.llm_timeout_secs = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.generation_mode {
            self.generation_mode = v;
        }
        if let Some(v) = file.max_avoid_context {
            self.max_avoid_context = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        Ok(())
    }

    /// 合并环境变量，`lookup` 便于测试时替换真实环境
    pub fn merge_vars<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("LLM_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.llm_api_key = key;
        }
        if let Some(v) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_TEMPERATURE", "f32")? {
            self.llm_temperature = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_MAX_TOKENS", "u32")? {
            self.llm_max_tokens = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_TIMEOUT_SECS", "u64")? {
            self.llm_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "u64")? {
            self.request_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "GENERATION_MODE", "sequential|concurrent")? {
            self.generation_mode = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_AVOID_CONTEXT", "usize")? {
            self.max_avoid_context = v;
        }
        if let Some(v) = parse_var(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey {
                var_name: "LLM_API_KEY".to_string(),
            }
            .into());
        }
        if self.llm_timeout_secs == 0 {
            return Err(invalid("llm_timeout_secs", "必须大于 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "必须大于 0"));
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(invalid("llm_temperature", "必须在 [0, 2] 之间"));
        }
        // 窗口小于 N-1 时后面的题会看不到前面全部题干
        if self.max_avoid_context < QUESTION_COUNT.saturating_sub(1) {
            return Err(invalid(
                "max_avoid_context",
                &format!("不能小于 {}", QUESTION_COUNT.saturating_sub(1)),
            ));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()),
        },
    }
}

fn invalid(field: &str, reason: &str) -> crate::error::AppError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
