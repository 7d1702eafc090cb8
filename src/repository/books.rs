//! Books repository for database operations

use sqlx::{Pool, Sqlite};

use super::{exists, invalid_pk};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, BookRecord, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, publication_year, author_id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Every book with its author's name, in storage order
    pub async fn list_records(&self) -> AppResult<Vec<BookRecord>> {
        let rows = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT b.id, b.title, b.publication_year, b.author_id, a.name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Books of one author, `(publication_year, title)` order
    pub async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books WHERE author_id = ? ORDER BY publication_year, title, id",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Books held by a library, `(publication_year, title)` order
    pub async fn list_by_library(&self, library_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.publication_year, b.author_id
            FROM library_books lb
            JOIN books b ON b.id = lb.book_id
            WHERE lb.library_id = ?
            ORDER BY b.publication_year, b.title, b.id
            "#,
        )
        .bind(library_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        if !exists(&mut tx, "authors", book.author_id).await? {
            return Err(invalid_pk("author", book.author_id).into());
        }

        let query = format!(
            "INSERT INTO books (title, publication_year, author_id) VALUES (?, ?, ?) RETURNING {}",
            BOOK_COLUMNS
        );
        let created = sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(book.publication_year)
            .bind(book.author_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Merge `changes` into the stored row and write it back
    pub async fn update(&self, id: i64, changes: &BookChanges) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS);
        let existing = sqlx::query_as::<_, Book>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let merged = changes.apply(&existing);
        if merged.author_id != existing.author
            && !exists(&mut tx, "authors", merged.author_id).await?
        {
            return Err(invalid_pk("author", merged.author_id).into());
        }

        let update = format!(
            "UPDATE books SET title = ?, publication_year = ?, author_id = ? WHERE id = ? RETURNING {}",
            BOOK_COLUMNS
        );
        let updated = sqlx::query_as::<_, Book>(&update)
            .bind(&merged.title)
            .bind(merged.publication_year)
            .bind(merged.author_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a book and its library links
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM library_books WHERE book_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
