//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod librarians;
pub mod libraries;
mod seed;
pub mod users;

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::error::{AppResult, FieldErrors};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub libraries: libraries::LibrariesRepository,
    pub librarians: librarians::LibrariansRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            libraries: libraries::LibrariesRepository::new(pool.clone()),
            librarians: librarians::LibrariansRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Lightweight connectivity check
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Whether a row with `id` exists in `table` (table names are internal constants)
pub(crate) async fn exists(conn: &mut SqliteConnection, table: &str, id: i64) -> AppResult<bool> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table);
    let found: bool = sqlx::query_scalar(&query).bind(id).fetch_one(conn).await?;
    Ok(found)
}

/// Field error for a reference to a missing row
pub(crate) fn invalid_pk(field: &str, id: i64) -> FieldErrors {
    FieldErrors::single(field, format!("Invalid pk \"{}\" - object does not exist.", id))
}
