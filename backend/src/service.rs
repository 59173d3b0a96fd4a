use crate::config::ServiceConfig;
use crate::dbs::{Database, DbError};
use crate::error::LookupError;
use crate::generation::{GenResult, GenerationError, ImageGenerator, TextGenerator};
use crate::images::OpenAiImageGenerator;
use crate::openai::OpenAiTextGenerator;
use crate::validator::{HttpResourceValidator, ResourceValidator};
use shared::models::Character;
use std::sync::Arc;
use tracing::{info, warn};

pub type LookupResult<T> = Result<T, LookupError>;

/// The generator pair. Only built when an API key is configured.
#[derive(Clone)]
pub struct Generators {
    pub text: Arc<dyn TextGenerator>,
    pub image: Arc<dyn ImageGenerator>,
}

/// Lookup-or-generate workflow for characters.
///
/// A request runs to completion on one task: lookup, then either probe the
/// cached image (regenerating it when dead) or generate text, image and
/// persist.
pub struct CharacterService {
    db: Arc<dyn Database>,
    validator: Arc<dyn ResourceValidator>,
    generators: Option<Generators>,
}

impl CharacterService {
    pub fn new(
        db: Arc<dyn Database>,
        validator: Arc<dyn ResourceValidator>,
        generators: Option<Generators>,
    ) -> Self {
        Self {
            db,
            validator,
            generators,
        }
    }

    pub fn from_config(config: &ServiceConfig, db: Arc<dyn Database>) -> GenResult<Self> {
        let validator = HttpResourceValidator::new(config.probe_timeout)
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let generators = match config.api_key() {
            Some(key) => Some(Generators {
                text: Arc::new(OpenAiTextGenerator::new(config, key)),
                image: Arc::new(OpenAiImageGenerator::new(config, key)?),
            }),
            None => {
                warn!("No OpenAI API key configured, only cached characters can be served");
                None
            }
        };

        Ok(Self::new(db, Arc::new(validator), generators))
    }

    pub async fn lookup(&self, search: &str) -> LookupResult<Character> {
        let term = search.trim();
        if term.is_empty() {
            return Err(LookupError::InvalidSearch);
        }
        let name = normalize_name(term);
        info!(name = %name, "looking up character");

        match self.db.find_by_name(&name).await? {
            Some(character) => self.serve_cached(character).await,
            None => {
                info!(name = %name, "character not stored, generating");
                self.generate(term, &name).await
            }
        }
    }

    async fn serve_cached(&self, character: Character) -> LookupResult<Character> {
        if self.validator.is_live(&character.image_url).await {
            info!(name = %character.name, "serving stored character");
            return Ok(character);
        }

        warn!(name = %character.name, "stored image is gone, regenerating");
        let generators = self.generators()?;
        let image_url = generators
            .image
            .illustrate(&character.name)
            .await
            .map_err(LookupError::from_image)?;

        let updated = self
            .db
            .update_image_url(&character.name, &image_url)
            .await?;
        info!(name = %updated.name, "stored image replaced");
        Ok(updated)
    }

    async fn generate(&self, term: &str, name: &str) -> LookupResult<Character> {
        let generators = self.generators()?;

        let profile = generators.text.describe(term).await.map_err(|e| match e {
            GenerationError::Exhausted { attempts } => LookupError::GenerationExhausted { attempts },
            other => LookupError::Unexpected(other.to_string()),
        })?;

        let image_url = generators
            .image
            .illustrate(name)
            .await
            .map_err(LookupError::from_image)?;

        let character = Character::new(name.to_string(), profile.description, image_url);
        match self.db.create(character).await {
            Ok(created) => {
                info!(name = %created.name, id = %created.id, "character created");
                Ok(created)
            }
            Err(DbError::Conflict(_)) => {
                // Another request created the same name first.
                warn!(name, "character created concurrently, returning stored record");
                self.db.find_by_name(name).await?.ok_or_else(|| {
                    LookupError::Unexpected(format!("character {} vanished after conflict", name))
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn generators(&self) -> LookupResult<&Generators> {
        self.generators
            .as_ref()
            .ok_or(LookupError::ConfigurationMissing)
    }
}

pub fn normalize_name(search: &str) -> String {
    search.trim().to_lowercase()
}
