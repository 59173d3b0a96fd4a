use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A mythological character as stored and served.
///
/// `name` is always the normalized (trimmed, lowercased) search term and is
/// unique across the store. `image_url` points into the image provider's
/// asset store and may expire independently of this record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl Character {
    pub fn new(name: String, description: String, image_url: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            description,
            image_url,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SearchRequest {
    pub search: String,
}
