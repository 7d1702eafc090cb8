//! Library and librarian service

use crate::{
    error::{AppError, AppResult},
    models::{
        librarian::{Librarian, LibrarianPayload},
        library::{Library, LibraryDetail, LibraryPayload},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LibrariesService {
    repository: Repository,
}

impl LibrariesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_libraries(&self) -> AppResult<Vec<Library>> {
        self.repository.libraries.list().await
    }

    /// Library with its holdings and librarian
    pub async fn get_library(&self, id: i64) -> AppResult<LibraryDetail> {
        let library = self.repository.libraries.get_by_id(id).await?;
        let books = self.repository.books.list_by_library(id).await?;
        let librarian = self.repository.librarians.get_by_library(id).await?;
        Ok(LibraryDetail {
            id: library.id,
            name: library.name,
            books,
            librarian,
        })
    }

    pub async fn create_library(&self, payload: LibraryPayload, by: &UserClaims) -> AppResult<LibraryDetail> {
        let changes = payload.into_changes(false)?;
        let name = changes.name.unwrap_or_default();
        let books = changes.books.unwrap_or_default();
        let library = self.repository.libraries.create(&name, &books).await?;
        tracing::info!(library_id = library.id, user = %by.sub, "Library created");
        self.get_library(library.id).await
    }

    pub async fn update_library(
        &self,
        id: i64,
        payload: LibraryPayload,
        partial: bool,
        by: &UserClaims,
    ) -> AppResult<LibraryDetail> {
        self.repository.libraries.get_by_id(id).await?;
        let changes = payload.into_changes(partial)?;
        self.repository.libraries.update(id, &changes).await?;
        tracing::info!(library_id = id, user = %by.sub, "Library updated");
        self.get_library(id).await
    }

    pub async fn add_books(&self, id: i64, books: &[i64], by: &UserClaims) -> AppResult<LibraryDetail> {
        self.repository.libraries.add_books(id, books).await?;
        tracing::info!(library_id = id, added = books.len(), user = %by.sub, "Books added to library");
        self.get_library(id).await
    }

    pub async fn remove_book(&self, id: i64, book_id: i64, by: &UserClaims) -> AppResult<()> {
        self.repository.libraries.remove_book(id, book_id).await?;
        tracing::info!(library_id = id, book_id, user = %by.sub, "Book removed from library");
        Ok(())
    }

    pub async fn delete_library(&self, id: i64, by: &UserClaims) -> AppResult<()> {
        self.repository.libraries.delete(id).await?;
        tracing::info!(library_id = id, user = %by.sub, "Library deleted");
        Ok(())
    }

    /// The librarian in charge of a library
    pub async fn librarian_for_library(&self, id: i64) -> AppResult<Librarian> {
        let library = self.repository.libraries.get_by_id(id).await?;
        self.repository
            .librarians
            .get_by_library(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No librarian assigned to '{}'.", library.name)))
    }

    // =========================================================================
    // LIBRARIANS
    // =========================================================================

    pub async fn list_librarians(&self) -> AppResult<Vec<Librarian>> {
        self.repository.librarians.list().await
    }

    pub async fn get_librarian(&self, id: i64) -> AppResult<Librarian> {
        self.repository.librarians.get_by_id(id).await
    }

    pub async fn create_librarian(&self, payload: LibrarianPayload, by: &UserClaims) -> AppResult<Librarian> {
        let changes = payload.into_changes(false)?;
        let name = changes.name.unwrap_or_default();
        let library_id = changes.library_id.unwrap_or_default();
        let librarian = self.repository.librarians.create(&name, library_id).await?;
        tracing::info!(librarian_id = librarian.id, library_id, user = %by.sub, "Librarian created");
        Ok(librarian)
    }

    pub async fn update_librarian(
        &self,
        id: i64,
        payload: LibrarianPayload,
        partial: bool,
        by: &UserClaims,
    ) -> AppResult<Librarian> {
        self.repository.librarians.get_by_id(id).await?;
        let changes = payload.into_changes(partial)?;
        let librarian = self.repository.librarians.update(id, &changes).await?;
        tracing::info!(librarian_id = id, user = %by.sub, "Librarian updated");
        Ok(librarian)
    }

    pub async fn delete_librarian(&self, id: i64, by: &UserClaims) -> AppResult<()> {
        self.repository.librarians.delete(id).await?;
        tracing::info!(librarian_id = id, user = %by.sub, "Librarian deleted");
        Ok(())
    }
}
