use crate::config::ServiceConfig;
use crate::generation::{GenResult, GenerationError, ImageGenerator, image_prompt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// [`ImageGenerator`] that calls the `/images/generations` endpoint once per
/// request.
pub struct OpenAiImageGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: Option<String>,
    size: String,
    timeout_secs: u64,
}

impl OpenAiImageGenerator {
    pub fn new(config: &ServiceConfig, api_key: &str) -> GenResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.generation_timeout)
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/images/generations", config.api_base()),
            api_key: api_key.to_string(),
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            timeout_secs: config.generation_timeout.as_secs(),
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn illustrate(&self, name: &str) -> GenResult<String> {
        let request = ImageRequest {
            model: self.model.as_deref(),
            prompt: image_prompt(name),
            n: 1,
            size: &self.size,
            response_format: "url",
        };
        debug!(name, prompt = %request.prompt, "requesting image");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.timeout_secs)
                } else {
                    GenerationError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Request(format!(
                "image API error {}: {}",
                status, body
            )));
        }

        let image_response: ImageResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let url = first_image_url(&image_response).ok_or(GenerationError::NoImageUrl)?;
        info!(name, "image generated");
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    prompt: String,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

fn first_image_url(response: &ImageResponse) -> Option<String> {
    response
        .data
        .first()
        .and_then(|image| image.url.as_deref())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}
