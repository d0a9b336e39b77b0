use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use super::store_error;
use super::token::parse_uuid;
use crate::store::{StoreError, User, UserDirectory};

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
        })
    }
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Delete a user by ID. Their refresh tokens are left in place.
    pub async fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete user", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_one(&self, sql: &'static str, value: String) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("Failed to get user", e))?;
        row.map(User::try_from).transpose()
    }
}

impl UserDirectory for UserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one(
            "SELECT id, username, email, password_hash FROM users WHERE username = ?",
            username.to_string(),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_one(
            "SELECT id, username, email, password_hash FROM users WHERE email = ?",
            email.to_string(),
        )
        .await
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, StoreError> {
        self.find_one(
            "SELECT id, username, email, password_hash FROM users WHERE id = ?",
            id.to_string(),
        )
        .await
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, username, email, password_hash) VALUES (?, ?, ?, ?)")
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to create user", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn alice() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = Database::open(":memory:").await.unwrap();
        let user = alice();

        db.users().create(&user).await.unwrap();

        let by_name = db.users().find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name, user);

        let by_email = db
            .users()
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = db.users().find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
    }

    #[tokio::test]
    async fn test_username_lookup_ignores_case() {
        let db = Database::open(":memory:").await.unwrap();
        db.users().create(&alice()).await.unwrap();

        assert!(db.users().find_by_username("ALICE").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let db = Database::open(":memory:").await.unwrap();

        assert!(db.users().find_by_username("bob").await.unwrap().is_none());
        assert!(db.users().find_by_id(&Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = Database::open(":memory:").await.unwrap();
        db.users().create(&alice()).await.unwrap();

        let mut other = alice();
        other.email = "other@example.com".to_string();
        let result = db.users().create(&other).await;

        assert_eq!(result, Err(StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = Database::open(":memory:").await.unwrap();
        let user = alice();
        db.users().create(&user).await.unwrap();

        assert!(db.users().delete(&user.id).await.unwrap());
        assert!(db.users().find_by_id(&user.id).await.unwrap().is_none());
    }
}
