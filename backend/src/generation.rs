use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type GenResult<T> = Result<T, GenerationError>;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant providing detailed information about mythological characters, creatures and lores, including their origin, stories, cultural significance, and symbolic imagery. Always respond with a single strict JSON object with exactly the keys `name` and `description`, and nothing else.";

/// Substrings that mark a description as describing fiction or film rather
/// than myth.
pub const DISQUALIFYING_MARKERS: [&str; 2] = ["fictional", "movie"];

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Request error: {0}")]
    Request(String),
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Completion contained no content")]
    EmptyCompletion,
    #[error("No image URL in response")]
    NoImageUrl,
    #[error("No acceptable description after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Structured record the text generator must return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produces a profile that passed [`passes_quality_gate`], or
    /// [`GenerationError::Exhausted`].
    async fn describe(&self, name: &str) -> GenResult<CharacterProfile>;
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one illustration and returns its hosted URL.
    async fn illustrate(&self, name: &str) -> GenResult<String>;
}

pub fn user_prompt(name: &str) -> String {
    format!(
        "Provide detailed information about the mythological character named \"{name}\". The JSON object should include:\n\
         - name: The character's name.\n\
         - description: A detailed description of the character's origin, major stories, and symbolic significance."
    )
}

pub fn image_prompt(name: &str) -> String {
    format!("{name}, a mythological character, rendered in a grand, realistic, aesthetic fashion.")
}

/// Strips the code fences chat models like to wrap JSON in.
///
/// This tolerates formatting noise only; the result still has to parse.
pub fn sanitize_completion(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

pub fn parse_profile(raw: &str) -> GenResult<CharacterProfile> {
    let cleaned = sanitize_completion(raw);
    serde_json::from_str(&cleaned).map_err(|e| GenerationError::MalformedResponse(e.to_string()))
}

pub fn passes_quality_gate(profile: &CharacterProfile) -> bool {
    if profile.name.trim().is_empty() || profile.description.trim().is_empty() {
        return false;
    }
    let description = profile.description.to_lowercase();
    !DISQUALIFYING_MARKERS
        .iter()
        .any(|marker| description.contains(marker))
}
