//! LLM 服务 - 业务能力层
//!
//! 只负责"给定系统提示词和用户文本，生成一段文本"，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};

const SERVICE: &str = "llm";

/// 一次生成请求
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// 文本生成后端
///
/// 失败（超时、限流、响应格式错误）直接返回错误，不做自动重试。
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest<'_>) -> PipelineResult<String>;
}

/// LLM 服务
///
/// 职责：
/// - 持有 OpenAI 兼容客户端
/// - 只处理单个文档的生成请求
/// - 不出现文件路径 / 批次信息
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
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
        }
    }

    fn build_messages(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<Vec<ChatCompletionRequestMessage>, async_openai::error::OpenAIError> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user)
            .build()?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, request: GenerationRequest<'_>) -> PipelineResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", request.user.len());

        let messages = self
            .build_messages(&request)
            .map_err(|e| PipelineError::external_service(SERVICE, e))?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()
            .map_err(|e| PipelineError::external_service(SERVICE, e))?;

        let response = self.client.chat().create(chat_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            PipelineError::external_service(SERVICE, e)
        })?;

        debug!("LLM API 调用成功");

        // 没有 choice 或 content 为 null 属于响应格式错误；空白文本交给调用方判断
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| PipelineError::external_service(SERVICE, "响应中没有内容"))?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_build_messages() {
        let service = create_test_service();
        let messages = service
            .build_messages(&GenerationRequest {
                system: "sys",
                user: "user",
                temperature: 0.3,
                max_tokens: 16,
            })
            .unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    fn service_for(server: &MockServer) -> LlmService {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            llm_api_base_url: server.uri(),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    fn completion_body(choices: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 0,
            "model": "test-model",
            "choices": choices
        })
    }

    async fn generate_with(choices: serde_json::Value) -> PipelineResult<String> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(choices)))
            .mount(&server)
            .await;

        service_for(&server)
            .generate(GenerationRequest {
                system: "sys",
                user: "user",
                temperature: 0.3,
                max_tokens: 16,
            })
            .await
    }

    #[tokio::test]
    async fn test_no_choices_is_external_service_error() {
        let err = generate_with(serde_json::json!([])).await.unwrap_err();
        assert!(matches!(err, PipelineError::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_null_content_is_external_service_error() {
        let choices = serde_json::json!([{
            "index": 0,
            "message": { "role": "assistant", "content": null },
            "finish_reason": "stop"
        }]);
        let err = generate_with(choices).await.unwrap_err();
        assert!(matches!(err, PipelineError::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_blank_content_is_returned_as_is() {
        let choices = serde_json::json!([{
            "index": 0,
            "message": { "role": "assistant", "content": "  " },
            "finish_reason": "stop"
        }]);
        let text = generate_with(choices).await.unwrap();
        assert_eq!(text, "  ");
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

        let service = create_test_service();
        let response = service
            .generate(GenerationRequest {
                system: "You are a concise assistant.",
                user: "Reply with the single word: ok",
                temperature: 0.0,
                max_tokens: 8,
            })
            .await;

        match response {
            Ok(text) => {
                println!("LLM 响应: {}", text);
                assert!(!text.trim().is_empty());
            }
            Err(e) => panic!("LLM 调用失败: {}", e),
        }
    }
}
