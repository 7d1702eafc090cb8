//! Librarians repository for database operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use super::{exists, invalid_pk};
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::librarian::{Librarian, LibrarianChanges},
};

const LIBRARIAN_COLUMNS: &str = "id, name, library_id";

#[derive(Clone)]
pub struct LibrariansRepository {
    pool: Pool<Sqlite>,
}

impl LibrariansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Librarian>> {
        let query = format!("SELECT {} FROM librarians ORDER BY name, id", LIBRARIAN_COLUMNS);
        let rows = sqlx::query_as::<_, Librarian>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Librarian> {
        let query = format!("SELECT {} FROM librarians WHERE id = ?", LIBRARIAN_COLUMNS);
        sqlx::query_as::<_, Librarian>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Librarian {} not found", id)))
    }

    /// The librarian assigned to a library, if any
    pub async fn get_by_library(&self, library_id: i64) -> AppResult<Option<Librarian>> {
        let query = format!("SELECT {} FROM librarians WHERE library_id = ?", LIBRARIAN_COLUMNS);
        let librarian = sqlx::query_as::<_, Librarian>(&query)
            .bind(library_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(librarian)
    }

    pub async fn create(&self, name: &str, library_id: i64) -> AppResult<Librarian> {
        let mut tx = self.pool.begin().await?;

        check_library_available(&mut tx, library_id, None).await?;
        let query = format!(
            "INSERT INTO librarians (name, library_id) VALUES (?, ?) RETURNING {}",
            LIBRARIAN_COLUMNS
        );
        let librarian = sqlx::query_as::<_, Librarian>(&query)
            .bind(name)
            .bind(library_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(librarian)
    }

    pub async fn update(&self, id: i64, changes: &LibrarianChanges) -> AppResult<Librarian> {
        let mut tx = self.pool.begin().await?;

        let select = format!("SELECT {} FROM librarians WHERE id = ?", LIBRARIAN_COLUMNS);
        let existing = sqlx::query_as::<_, Librarian>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Librarian {} not found", id)))?;

        let name = changes.name.clone().unwrap_or(existing.name);
        let library_id = changes.library_id.unwrap_or(existing.library);
        if library_id != existing.library {
            check_library_available(&mut tx, library_id, Some(id)).await?;
        }

        let update = format!(
            "UPDATE librarians SET name = ?, library_id = ? WHERE id = ? RETURNING {}",
            LIBRARIAN_COLUMNS
        );
        let updated = sqlx::query_as::<_, Librarian>(&update)
            .bind(&name)
            .bind(library_id)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM librarians WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Librarian {} not found", id)));
        }
        Ok(())
    }
}

/// The library must exist and have no other librarian
async fn check_library_available(
    conn: &mut SqliteConnection,
    library_id: i64,
    except: Option<i64>,
) -> AppResult<()> {
    if !exists(conn, "libraries", library_id).await? {
        return Err(invalid_pk("library", library_id).into());
    }
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM librarians WHERE library_id = ? AND id != ?)",
    )
    .bind(library_id)
    .bind(except.unwrap_or(0))
    .fetch_one(&mut *conn)
    .await?;
    if taken {
        return Err(FieldErrors::single("library", "librarian with this library already exists.").into());
    }
    Ok(())
}
