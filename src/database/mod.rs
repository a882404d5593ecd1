use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::models::{MuscleFocus, RestrictionRule};

/// Read access to the reference option tables.
#[async_trait]
pub trait OptionsStore: Send + Sync {
    async fn restriction_rules(&self) -> Result<Vec<RestrictionRule>, sqlx::Error>;
    async fn muscle_focuses(&self) -> Result<Vec<MuscleFocus>, sqlx::Error>;
    async fn health_check(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS restriction_rules (
                id SERIAL PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                description TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS muscle_groups (
                id SERIAL PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS muscle_focuses (
                id SERIAL PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                muscle_group_id INTEGER NOT NULL REFERENCES muscle_groups (id),
                priority_modifier DOUBLE PRECISION NOT NULL DEFAULT 1.0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO restriction_rules (slug, name, description)
            VALUES
                ('no-jumping', 'Без прыжков', 'Исключить прыжковые и ударные упражнения'),
                ('no-axial-load', 'Без осевой нагрузки', 'Исключить упражнения с нагрузкой на позвоночник'),
                ('knee-friendly', 'Бережём колени', 'Исключить глубокие приседы и выпады'),
                ('bodyweight-only', 'Без оборудования', 'Только упражнения с собственным весом')
            ON CONFLICT (slug) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO muscle_groups (slug, name)
            VALUES
                ('chest', 'Грудь'),
                ('back', 'Спина'),
                ('legs', 'Ноги'),
                ('shoulders', 'Плечи'),
                ('arms', 'Руки'),
                ('core', 'Кор')
            ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO muscle_focuses (slug, name, muscle_group_id, priority_modifier)
            SELECT f.slug, f.name, g.id, f.priority_modifier
            FROM (VALUES
                ('chest-focus', 'Акцент на грудь', 'chest', 1.5),
                ('back-focus', 'Акцент на спину', 'back', 1.5),
                ('glutes-focus', 'Акцент на ягодицы', 'legs', 1.5),
                ('shoulders-focus', 'Акцент на плечи', 'shoulders', 1.3),
                ('arms-focus', 'Акцент на руки', 'arms', 1.3),
                ('core-focus', 'Акцент на пресс', 'core', 1.2)
            ) AS f (slug, name, group_slug, priority_modifier)
            JOIN muscle_groups g ON g.slug = f.group_slug
            WHERE true
            ON CONFLICT (slug) DO UPDATE SET
                name = EXCLUDED.name,
                muscle_group_id = EXCLUDED.muscle_group_id,
                priority_modifier = EXCLUDED.priority_modifier
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl OptionsStore for Database {
    async fn restriction_rules(&self) -> Result<Vec<RestrictionRule>, sqlx::Error> {
        sqlx::query_as::<_, RestrictionRule>(
            "SELECT id, slug, name, description FROM restriction_rules ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn muscle_focuses(&self) -> Result<Vec<MuscleFocus>, sqlx::Error> {
        sqlx::query_as::<_, MuscleFocus>(
            "SELECT id, slug, name, muscle_group_id, priority_modifier FROM muscle_focuses ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn connect() -> Database {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        Database::new(&url).await.expect("database is reachable")
    }

    fn ascending(ids: &[i32]) -> bool {
        ids.windows(2).all(|pair| pair[0] < pair[1])
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn init_seeds_and_queries_return_id_order() {
        let db = connect().await;
        db.init().await.unwrap();
        // Seeding is an upsert, so a second run must not fail or duplicate rows
        db.init().await.unwrap();

        assert!(db.health_check().await);

        let rules = db.restriction_rules().await.unwrap();
        let rule_ids: Vec<i32> = rules.iter().map(|rule| rule.id).collect();
        assert!(ascending(&rule_ids), "{rule_ids:?}");
        for slug in ["no-jumping", "no-axial-load", "knee-friendly", "bodyweight-only"] {
            assert_eq!(rules.iter().filter(|rule| rule.slug == slug).count(), 1, "{slug}");
        }

        let focuses = db.muscle_focuses().await.unwrap();
        let focus_ids: Vec<i32> = focuses.iter().map(|focus| focus.id).collect();
        assert!(ascending(&focus_ids), "{focus_ids:?}");
        let chest = focuses.iter().find(|focus| focus.slug == "chest-focus").unwrap();
        assert_eq!(chest.priority_modifier, 1.5);

        let (chest_group,): (i32,) = sqlx::query_as("SELECT id FROM muscle_groups WHERE slug = 'chest'")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(chest.muscle_group_id, chest_group);
    }
}
