use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use shared::models::Character;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        // Compatible with PostgreSQL/CockroachDB
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL,
                image_url TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn character_from_row(row: &PgRow) -> DbResult<Character> {
    Ok(Character {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
    })
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn find_by_name(&self, name: &str) -> DbResult<Option<Character>> {
        let row = sqlx::query("SELECT id, name, description, image_url FROM characters WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(character_from_row).transpose()
    }

    async fn create(&self, character: Character) -> DbResult<Character> {
        sqlx::query(
            "INSERT INTO characters (id, name, description, image_url) VALUES ($1, $2, $3, $4)",
        )
        .bind(character.id)
        .bind(&character.name)
        .bind(&character.description)
        .bind(&character.image_url)
        .execute(&self.pool)
        .await?;
        Ok(character)
    }

    async fn update_image_url(&self, name: &str, image_url: &str) -> DbResult<Character> {
        let row = sqlx::query(
            "UPDATE characters SET image_url = $1 WHERE name = $2 RETURNING id, name, description, image_url",
        )
        .bind(image_url)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => character_from_row(&row),
            None => Err(DbError::NotFound(format!("Character {} not found", name))),
        }
    }
}
