use backend::config::{
    DEFAULT_API_BASE, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_TEXT_MODEL, ServiceConfig,
};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Look up or generate mythological characters")]
pub struct Cli {
    #[arg(long, env = "MYTHOS_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,
    #[arg(long, env = "MYTHOS_PORT", default_value_t = 8080)]
    pub port: u16,
    /// Prebuilt frontend to serve for every non-API path
    #[arg(long)]
    pub dist_dir: Option<PathBuf>,
    /// `sqlite://...` or `postgres://...`
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://mythos.db?mode=rwc")]
    pub database_url: String,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,
    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub openai_api_base: String,
    #[arg(long, default_value = DEFAULT_TEXT_MODEL)]
    pub text_model: String,
    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,
    /// Text generation attempts before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
    #[arg(long)]
    pub image_model: Option<String>,
    #[arg(long, default_value = DEFAULT_IMAGE_SIZE)]
    pub image_size: String,
    #[arg(long, default_value_t = 60)]
    pub generation_timeout_secs: u64,
    #[arg(long, default_value_t = 10)]
    pub probe_timeout_secs: u64,
}

impl Cli {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            openai_api_key: self.openai_api_key.clone(),
            openai_api_base: self.openai_api_base.clone(),
            text_model: self.text_model.clone(),
            temperature: self.temperature,
            max_attempts: self.max_attempts,
            image_model: self.image_model.clone(),
            image_size: self.image_size.clone(),
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
        }
    }
}
