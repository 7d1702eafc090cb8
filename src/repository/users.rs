//! Users repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, User, UserRow},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Sqlite>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT id, login, password, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by login (case-insensitive)
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, password, role FROM users WHERE login = ? COLLATE NOCASE",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user.map(User::from))
    }

    pub async fn login_exists(&self, login: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE login = ? COLLATE NOCASE)",
        )
        .bind(login)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a user; `password_hash` must already be hashed
    pub async fn create(&self, login: &str, password_hash: &str, role: Role) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (login, password, role) VALUES (?, ?, ?) RETURNING id, login, password, role",
        )
        .bind(login)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Login '{}' already exists", login))
            }
            other => AppError::Database(other),
        })?;
        Ok(row.into())
    }

    pub async fn update_role(&self, id: i64, role: Role) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(
            "UPDATE users SET role = ? WHERE id = ? RETURNING id, login, password, role",
        )
        .bind(role.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::from)
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }
}
