//! Authors repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::author::Author,
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Sqlite>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all authors by name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn create(&self, name: &str) -> AppResult<Author> {
        let mut tx = self.pool.begin().await?;
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(author)
    }

    /// Rename an author; `None` leaves the row untouched
    pub async fn update(&self, id: i64, name: Option<&str>) -> AppResult<Author> {
        let mut tx = self.pool.begin().await?;

        let author = match name {
            Some(name) => sqlx::query_as::<_, Author>(
                "UPDATE authors SET name = ? WHERE id = ? RETURNING id, name",
            )
            .bind(name)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?,
            None => sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?,
        }
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;

        tx.commit().await?;
        Ok(author)
    }

    /// Delete an author together with all of their books. Children go first,
    /// inside the same transaction as the parent.
    pub async fn delete(&self, id: i64) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM library_books WHERE book_id IN (SELECT id FROM books WHERE author_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let books = sqlx::query("DELETE FROM books WHERE author_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }

        tx.commit().await?;
        Ok(books)
    }
}
