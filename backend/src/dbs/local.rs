use crate::dbs::{Database, DbError, DbResult};
use async_trait::async_trait;
use shared::models::Character;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use std::time::Duration;

/// SQLite-backed store, the default for single-machine deployments.
#[derive(Clone)]
pub struct LocalDatabase {
    pool: Pool<Sqlite>,
}

impl LocalDatabase {
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database only exists for as long as its connection does.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    async fn init(&self) -> DbResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS characters (
                id BLOB PRIMARY KEY,
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

fn character_from_row(row: &SqliteRow) -> DbResult<Character> {
    Ok(Character {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
    })
}

#[async_trait]
impl Database for LocalDatabase {
    async fn find_by_name(&self, name: &str) -> DbResult<Option<Character>> {
        let row = sqlx::query("SELECT id, name, description, image_url FROM characters WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(character_from_row).transpose()
    }

    async fn create(&self, character: Character) -> DbResult<Character> {
        sqlx::query("INSERT INTO characters (id, name, description, image_url) VALUES (?, ?, ?, ?)")
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
            "UPDATE characters SET image_url = ? WHERE name = ? RETURNING id, name, description, image_url",
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
