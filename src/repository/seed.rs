//! Sample catalog used for demos and local development

use sqlx::SqliteConnection;

use super::Repository;
use crate::error::AppResult;

struct SampleAuthor {
    name: &'static str,
    books: &'static [(&'static str, i32)],
}

struct SampleLibrary {
    name: &'static str,
    books: &'static [&'static str],
    librarian: &'static str,
}

const AUTHORS: &[SampleAuthor] = &[
    SampleAuthor {
        name: "J.K. Rowling",
        books: &[("Harry Potter", 1997), ("Fantastic Beasts", 2001)],
    },
    SampleAuthor {
        name: "George Orwell",
        books: &[("1984", 1949), ("Animal Farm", 1945)],
    },
];

const LIBRARIES: &[SampleLibrary] = &[
    SampleLibrary {
        name: "Central Library",
        books: &["Harry Potter", "Fantastic Beasts", "1984"],
        librarian: "John Smith",
    },
    SampleLibrary {
        name: "Community Library",
        books: &["Fantastic Beasts", "1984", "Animal Farm"],
        librarian: "Jane Doe",
    },
];

impl Repository {
    /// Insert the sample catalog when the store holds no authors yet.
    /// Returns whether anything was written.
    pub async fn seed_sample_data(&self) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let authors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&mut *tx)
            .await?;
        if authors > 0 {
            return Ok(false);
        }

        let mut book_ids = Vec::new();
        for author in AUTHORS {
            let author_id: i64 = sqlx::query_scalar("INSERT INTO authors (name) VALUES (?) RETURNING id")
                .bind(author.name)
                .fetch_one(&mut *tx)
                .await?;

            for (title, year) in author.books {
                let book_id: i64 = sqlx::query_scalar(
                    "INSERT INTO books (title, publication_year, author_id) VALUES (?, ?, ?) RETURNING id",
                )
                .bind(*title)
                .bind(*year)
                .bind(author_id)
                .fetch_one(&mut *tx)
                .await?;
                book_ids.push((*title, book_id));
            }
        }

        for library in LIBRARIES {
            insert_library(&mut tx, library, &book_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}

async fn insert_library(
    conn: &mut SqliteConnection,
    library: &SampleLibrary,
    book_ids: &[(&str, i64)],
) -> AppResult<()> {
    let library_id: i64 = sqlx::query_scalar("INSERT INTO libraries (name) VALUES (?) RETURNING id")
        .bind(library.name)
        .fetch_one(&mut *conn)
        .await?;

    for title in library.books {
        let Some((_, book_id)) = book_ids.iter().find(|(t, _)| t == title) else {
            continue;
        };
        sqlx::query("INSERT INTO library_books (library_id, book_id) VALUES (?, ?)")
            .bind(library_id)
            .bind(*book_id)
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query("INSERT INTO librarians (name, library_id) VALUES (?, ?)")
        .bind(library.librarian)
        .bind(library_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
