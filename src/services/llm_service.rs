//! LLM 服务 - 业务能力层
//!
//! 只负责"把提示词发给模型并拿回文本"，提示词的内容和结果的解析由流程层负责
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::services::collaborators::ModelService;

/// LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_request(&self, prompt: &str) -> Result<CreateChatCompletionRequest, LlmError> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed {
                source: Box::new(e),
            })?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed {
                source: Box::new(e),
            })
    }
}

#[async_trait]
impl ModelService for LlmService {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let request = self.build_request(prompt)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
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
            llm_api_key: "test-key".to_string(),
            llm_model_name: "gemini-1.5-flash".to_string(),
            llm_temperature: 0.5,
            llm_max_tokens: 256,
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_build_request_uses_config() {
        let service = create_test_service();
        let request = service.build_request("Hello").unwrap();
        assert_eq!(request.model, "gemini-1.5-flash");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.temperature, Some(0.5));
    }

    /// 测试真实 LLM 调用
    ///
    /// 运行方式：
    /// ```bash
    /// LLM_API_KEY=... cargo test test_generate_live -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().expect("读取环境变量失败");
        let service = LlmService::new(&config);

        let response = service
            .generate("Reply with the JSON object {\"ok\": true} and nothing else.")
            .await
            .expect("LLM 调用失败");

        println!("LLM 响应: {}", response);
        assert!(!response.is_empty());
    }
}
