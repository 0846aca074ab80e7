//! User model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(rename = "selectedModelId")]
    pub selected_model_id: Option<i64>,
}

/// Body of signup and login requests
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields present and non-blank
    pub fn into_parts(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                Some((username.trim().to_string(), password))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
}

impl User {
    pub async fn create(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?1, ?2)
            RETURNING id, username, password_hash, selected_model_id
            "#
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, selected_model_id FROM users WHERE username = ?1"
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, selected_model_id FROM users WHERE id = ?1"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn select_model(pool: &SqlitePool, id: i64, model_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET selected_model_id = ?1 WHERE id = ?2")
            .bind(model_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let user = User::create(&pool, "operator", "hash").await.unwrap();
        assert_eq!(user.selected_model_id, None);

        let found = User::find_by_username(&pool, "operator").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(User::find_by_username(&pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_unique_violation() {
        let pool = test_pool().await;
        User::create(&pool, "operator", "hash").await.unwrap();

        let err = User::create(&pool, "operator", "other").await.unwrap_err();
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("Expected unique violation, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_require_both_fields() {
        let blank = CredentialsRequest { username: Some("  ".into()), password: Some("pw".into()) };
        assert!(blank.into_parts().is_none());

        let missing = CredentialsRequest { username: Some("op".into()), password: None };
        assert!(missing.into_parts().is_none());

        let ok = CredentialsRequest { username: Some(" op ".into()), password: Some("pw".into()) };
        assert_eq!(ok.into_parts(), Some(("op".to_string(), "pw".to_string())));
    }
}
