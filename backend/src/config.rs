use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_MAX_ATTEMPTS: usize = 4;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub text_model: String,
    pub temperature: f32,
    pub max_attempts: usize,
    /// `None` leaves the choice to the provider.
    pub image_model: Option<String>,
    pub image_size: String,
    /// Upper bound for a single text or image generation call.
    pub generation_timeout: Duration,
    /// Upper bound for a single image liveness probe.
    pub probe_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_api_base: DEFAULT_API_BASE.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            temperature: 0.7,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            image_model: None,
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            generation_timeout: Duration::from_secs(60),
            probe_timeout: Duration::from_secs(10),
        }
    }
}

impl ServiceConfig {
    /// The API key, if one is configured. Blank keys count as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn api_base(&self) -> &str {
        self.openai_api_base.trim_end_matches('/')
    }
}
