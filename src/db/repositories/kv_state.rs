use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::db::{Database, StateStore};

impl Database {
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.query_row(
                "SELECT value FROM kv_state WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read state key {key}"))
        })
        .await
    }

    pub async fn put_value(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO kv_state (key, value, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write state key {key}"))?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl StateStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.put_value(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("briefing.sqlite3");

        {
            let db = Database::new(path.clone()).unwrap();
            assert_eq!(db.get_value("template_weights").await.unwrap(), None);
            db.put_value("template_weights", "{}".to_string()).await.unwrap();
            db.put_value("template_weights", r#"{"stable":[60]}"#.to_string())
                .await
                .unwrap();
        }

        let db = Database::new(path).unwrap();
        let stored = StateStore::get(&db, "template_weights").await.unwrap();
        assert_eq!(stored.as_deref(), Some(r#"{"stable":[60]}"#));
    }
}
