use super::error::DatabaseError;
use super::schema::Database;

impl Database {
    // ========================================================================
    // User Preferences
    // ========================================================================

    /// Stored value for `key`, if any.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(value,)| value))
    }

    /// Insert or replace `key`, refreshing its timestamp.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        tracing::debug!(key = %key, "Stored preference");
        Ok(())
    }

    /// All `(key, value)` pairs whose key starts with `prefix`, ordered by key.
    ///
    /// `%` and `_` in the prefix match literally.
    pub async fn get_preferences_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, String)>, DatabaseError> {
        let escaped = prefix
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM user_preferences WHERE key LIKE ? ESCAPE '\\' ORDER BY key",
        )
        .bind(format!("{}%", escaped))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete every stored preference. Returns the number of rows removed.
    pub async fn clear_preferences(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM user_preferences")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_preference() {
        let db = test_db().await;
        assert_eq!(db.get_preference("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_preference_upserts() {
        let db = test_db().await;
        db.set_preference("theme", "dark").await.unwrap();
        db.set_preference("theme", "light").await.unwrap();
        assert_eq!(
            db.get_preference("theme").await.unwrap(),
            Some("light".to_string())
        );

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_preferences")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_prefix_lookup_is_literal() {
        let db = test_db().await;
        db.set_preference("keybind.quit", "q").await.unwrap();
        db.set_preference("keybind.help", "?").await.unwrap();
        db.set_preference("keybindXquit", "x").await.unwrap();
        db.set_preference("theme", "dark").await.unwrap();

        let rows = db.get_preferences_by_prefix("keybind.").await.unwrap();
        assert_eq!(
            rows,
            vec![
                ("keybind.help".to_string(), "?".to_string()),
                ("keybind.quit".to_string(), "q".to_string()),
            ]
        );

        let all = db.get_preferences_by_prefix("").await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_clear_preferences() {
        let db = test_db().await;
        db.set_preference("theme", "dark").await.unwrap();
        db.set_preference("other", "1").await.unwrap();

        assert_eq!(db.clear_preferences().await.unwrap(), 2);
        assert_eq!(db.get_preference("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_updated_at_is_set() {
        let db = test_db().await;
        db.set_preference("theme", "dark").await.unwrap();
        let (updated_at,): (String,) =
            sqlx::query_as("SELECT updated_at FROM user_preferences WHERE key = 'theme'")
                .fetch_one(&db.pool)
                .await
                .unwrap();
        assert!(!updated_at.is_empty());
    }
}
