//! Libraries repository for database operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use super::{exists, invalid_pk};
use crate::{
    error::{AppError, AppResult},
    models::library::{Library, LibraryChanges},
};

#[derive(Clone)]
pub struct LibrariesRepository {
    pool: Pool<Sqlite>,
}

impl LibrariesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all libraries by name
    pub async fn list(&self) -> AppResult<Vec<Library>> {
        let rows = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Library> {
        sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library {} not found", id)))
    }

    /// Create a library with its initial holdings
    pub async fn create(&self, name: &str, books: &[i64]) -> AppResult<Library> {
        let mut tx = self.pool.begin().await?;

        let library = sqlx::query_as::<_, Library>(
            "INSERT INTO libraries (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        link_books(&mut tx, library.id, books).await?;

        tx.commit().await?;
        Ok(library)
    }

    /// Rename and/or replace holdings
    pub async fn update(&self, id: i64, changes: &LibraryChanges) -> AppResult<Library> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, "libraries", id).await? {
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }
        if let Some(ref name) = changes.name {
            sqlx::query("UPDATE libraries SET name = ? WHERE id = ?")
                .bind(name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(ref books) = changes.books {
            sqlx::query("DELETE FROM library_books WHERE library_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_books(&mut tx, id, books).await?;
        }
        let library = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(library)
    }

    /// Add books to a library; already-held books are left as they are
    pub async fn add_books(&self, id: i64, books: &[i64]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, "libraries", id).await? {
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }
        link_books(&mut tx, id, books).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn remove_book(&self, id: i64, book_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, "libraries", id).await? {
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }
        let result = sqlx::query("DELETE FROM library_books WHERE library_id = ? AND book_id = ?")
            .bind(id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Book {} is not held by library {}",
                book_id, id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a library, its librarian and its holdings links. Books stay.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM librarians WHERE library_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM library_books WHERE library_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM libraries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Library {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Link existing books to a library, rejecting unknown ids
async fn link_books(conn: &mut SqliteConnection, library_id: i64, books: &[i64]) -> AppResult<()> {
    for &book_id in books {
        if !exists(conn, "books", book_id).await? {
            return Err(invalid_pk("books", book_id).into());
        }
        sqlx::query("INSERT OR IGNORE INTO library_books (library_id, book_id) VALUES (?, ?)")
            .bind(library_id)
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
