//! # Location Repository
//!
//! Shops are reference data: created at setup time (seed binary or server
//! startup), listed by clients, never deleted.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use emis_core::validation::validate_location_name;
use emis_core::{CoreError, Location};

/// Repository for location database operations.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    /// Creates a new LocationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LocationRepository { pool }
    }

    /// Inserts a new location.
    ///
    /// ## Errors
    /// * `DbError::Core` - name is blank or too long
    /// * `DbError::UniqueViolation` - a location with this name exists
    pub async fn insert(&self, name: &str) -> DbResult<Location> {
        let name = validate_location_name(name).map_err(CoreError::from)?;

        debug!(name = %name, "Inserting location");

        let result = sqlx::query("INSERT INTO locations (name) VALUES (?1)")
            .bind(&name)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("location name", name.as_str()),
                other => other,
            })?;

        Ok(Location {
            id: result.last_insert_rowid(),
            name,
        })
    }

    /// Returns the location with this name, inserting it first if missing.
    pub async fn ensure(&self, name: &str) -> DbResult<Location> {
        let name = validate_location_name(name).map_err(CoreError::from)?;

        let result = sqlx::query("INSERT INTO locations (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
            .bind(&name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(name = %name, "Created location");
        }

        self.get_by_name(&name)
            .await?
            .ok_or_else(|| DbError::not_found("Location", &name))
    }

    /// Gets a location by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>("SELECT id, name FROM locations WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    /// Gets a location by its exact name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>("SELECT id, name FROM locations WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    /// Lists every location in creation order.
    pub async fn list(&self) -> DbResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>("SELECT id, name FROM locations ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(locations)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let repo = db.locations();

        let shop = repo.insert("  Taylorsville ").await.unwrap();
        assert_eq!(shop.name, "Taylorsville");

        let by_id = repo.get_by_id(shop.id).await.unwrap().unwrap();
        assert_eq!(by_id, shop);

        let by_name = repo.get_by_name("Taylorsville").await.unwrap().unwrap();
        assert_eq!(by_name.id, shop.id);

        assert!(repo.get_by_id(shop.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = db().await;
        let repo = db.locations();

        repo.insert("Sandy").await.unwrap();
        let err = repo.insert("Sandy").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = db().await;

        let err = db.locations().insert("   ").await.unwrap_err();
        assert!(matches!(err, DbError::Core(_)));
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let db = db().await;
        let repo = db.locations();

        let first = repo.ensure("Draper").await.unwrap();
        let second = repo.ensure("Draper").await.unwrap();
        repo.ensure("West Jordan").await.unwrap();

        assert_eq!(first, second);

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Draper", "West Jordan"]);
    }
}
