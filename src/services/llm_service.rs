//! LLM 服务 - 业务能力层
//!
//! 只负责"把一对 system/user 指令发给 LLM 并取回文本"的能力，不关心题型和流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）
//! - 开启 JSON 模式，要求模型只返回一个 JSON 对象

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};

/// 外部文本生成服务的抽象
///
/// 生产环境由 [`LlmService`] 实现，测试中可替换为脚本化的假实现
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// 当前使用的模型名称（用于日志和错误信息）
    fn model_name(&self) -> &str;

    /// 发送一对角色指令，返回 LLM 的原始文本响应
    async fn send_to_llm(&self, user_message: &str, system_message: Option<&str>)
        -> AppResult<String>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 生成单道题目的 JSON
/// - 不解析 JSON，不关心题型
/// - 持有的 `Client` 可被多个请求并发共享
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }

    fn build_messages(
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(AppError::llm_request_build_failed)?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(AppError::llm_request_build_failed)?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        Ok(messages)
    }
}

#[async_trait]
impl ChatBackend for LlmService {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let messages = Self::build_messages(user_message, system_message)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()
            .map_err(AppError::llm_request_build_failed)?;

        // 超时后丢弃 future 即取消进行中的请求
        let response = match tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("LLM API 调用失败: {}", e);
                return Err(AppError::llm_api_failed(&self.model_name, e));
            }
            Err(_) => {
                warn!("LLM API 调用超时: {:?}", self.timeout);
                return Err(LlmError::Timeout {
                    model: self.model_name.clone(),
                    timeout_secs: self.timeout.as_secs(),
                }
                .into());
            }
        };

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_else(|_| "test-key".to_string()),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_build_messages_roles() {
        let messages = LlmService::build_messages("user", Some("system")).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));

        let messages = LlmService::build_messages("user", None).unwrap();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_model_name_from_config() {
        let service = create_test_service();
        assert_eq!(service.model_name(), "gpt-4-turbo");
    }

    /// 测试真实 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_send_to_llm_json -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_json() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = create_test_service();
        let result = service
            .send_to_llm(
                "주제: 조선시대 역사. {\"question\": \"...\"} 형식의 JSON 하나로 답하세요.",
                Some("당신은 JSON으로만 답하는 퀴즈 출제자입니다."),
            )
            .await;

        match result {
            Ok(response) => {
                println!("LLM 响应: {}", response);
                assert!(response.contains('{'));
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }
}
