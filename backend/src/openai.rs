use crate::config::ServiceConfig;
use crate::generation::{
    CharacterProfile, GenResult, GenerationError, SYSTEM_PROMPT, TextGenerator, parse_profile,
    passes_quality_gate, user_prompt,
};
use crate::retry;
use async_openai::{
    Client,
    config::OpenAIConfig,
    middleware::ReqwestService,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Chat-completion backed [`TextGenerator`].
pub struct OpenAiTextGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_attempts: usize,
    timeout: Duration,
}

impl OpenAiTextGenerator {
    pub fn new(config: &ServiceConfig, api_key: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.api_base());

        // Plain transport without the client's own retry layer: every attempt
        // is exactly one HTTP request.
        let client = Client::with_config(openai_config).with_http_service(ReqwestService::default());

        Self {
            client,
            model: config.text_model.clone(),
            temperature: config.temperature,
            max_attempts: config.max_attempts,
            timeout: config.generation_timeout,
        }
    }

    fn build_conversation(name: &str) -> GenResult<Vec<ChatCompletionRequestMessage>> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(user_prompt(name))
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ])
    }

    /// One completion request, sanitized and parsed. The quality gate is not
    /// applied here.
    async fn complete_once(&self, name: &str) -> GenResult<CharacterProfile> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(Self::build_conversation(name)?)
            .temperature(self.temperature)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(GenerationError::EmptyCompletion)?;

        parse_profile(&content)
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn describe(&self, name: &str) -> GenResult<CharacterProfile> {
        retry::attempt(
            self.max_attempts,
            |n| {
                debug!(attempt = n, name, "requesting character description");
                self.complete_once(name)
            },
            passes_quality_gate,
        )
        .await
        .map_err(|e| GenerationError::Exhausted {
            attempts: e.attempts,
        })
    }
}
