//! Catalog management service: books and authors

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetail, AuthorPayload},
        book::{Book, BookChanges, BookPayload},
        user::UserClaims,
    },
    repository::Repository,
    services::query::{self, BookQuery},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Database connectivity check used by `/ready`
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// Filter, search and order the whole collection
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let records = self.repository.books.list_records().await?;
        Ok(query::apply(records, query)
            .into_iter()
            .map(|record| record.book)
            .collect())
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create_book(&self, payload: BookPayload, by: &UserClaims) -> AppResult<Book> {
        let book = payload.into_new_book()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, user = %by.sub, "Book created");
        Ok(created)
    }

    /// PUT: every mutable field is replaced
    pub async fn replace_book(&self, id: i64, payload: BookPayload, by: &UserClaims) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        let changes = BookChanges::from(payload.into_new_book()?);
        let updated = self.repository.books.update(id, &changes).await?;
        tracing::info!(book_id = id, user = %by.sub, "Book replaced");
        Ok(updated)
    }

    /// PATCH: only supplied fields change
    pub async fn patch_book(&self, id: i64, payload: BookPayload, by: &UserClaims) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        let changes = payload.into_changes()?;
        let updated = self.repository.books.update(id, &changes).await?;
        tracing::info!(book_id = id, user = %by.sub, "Book updated");
        Ok(updated)
    }

    pub async fn delete_book(&self, id: i64, by: &UserClaims) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, user = %by.sub, "Book deleted");
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self) -> AppResult<Vec<AuthorDetail>> {
        let authors = self.repository.authors.list().await?;
        let mut details = Vec::with_capacity(authors.len());
        for author in authors {
            let books = self.repository.books.list_by_author(author.id).await?;
            details.push(AuthorDetail::new(author, books));
        }
        Ok(details)
    }

    pub async fn get_author(&self, id: i64) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetail::new(author, books))
    }

    pub async fn create_author(&self, payload: AuthorPayload, by: &UserClaims) -> AppResult<AuthorDetail> {
        let name = payload.into_name(false)?.unwrap_or_default();
        let author = self.repository.authors.create(&name).await?;
        tracing::info!(author_id = author.id, user = %by.sub, "Author created");
        Ok(AuthorDetail::new(author, Vec::new()))
    }

    /// PUT (`partial = false`) or PATCH (`partial = true`)
    pub async fn update_author(
        &self,
        id: i64,
        payload: AuthorPayload,
        partial: bool,
        by: &UserClaims,
    ) -> AppResult<AuthorDetail> {
        self.repository.authors.get_by_id(id).await?;
        let name = payload.into_name(partial)?;
        self.repository.authors.update(id, name.as_deref()).await?;
        tracing::info!(author_id = id, user = %by.sub, "Author updated");
        self.get_author(id).await
    }

    /// Delete an author and, transitively, every book they own
    pub async fn delete_author(&self, id: i64, by: &UserClaims) -> AppResult<()> {
        let removed_books = self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, removed_books, user = %by.sub, "Author deleted");
        Ok(())
    }

    // =========================================================================
    // SAMPLE DATA
    // =========================================================================

    /// Load the sample catalog into an empty store
    pub async fn seed_sample_data(&self) -> AppResult<()> {
        if self.repository.seed_sample_data().await? {
            tracing::info!("Sample catalog loaded");
        } else {
            tracing::debug!("Catalog not empty, skipping sample data");
        }
        Ok(())
    }
}
