//! Library model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{book::Book, check_name, integer_list, librarian::Librarian, IntegerInput, Nullable};
use crate::error::FieldErrors;

/// Library row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Library {
    pub id: i64,
    pub name: String,
}

/// Library with its holdings and librarian
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryDetail {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
    pub librarian: Option<Librarian>,
}

/// Create/update library request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LibraryPayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Nullable<String>,
    /// Book ids; when supplied they replace the current holdings
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<Vec<i64>>)]
    pub books: Nullable<Vec<IntegerInput>>,
}

/// Validated library fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryChanges {
    pub name: Option<String>,
    pub books: Option<Vec<i64>>,
}

impl LibraryPayload {
    pub fn into_changes(self, partial: bool) -> Result<LibraryChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = check_name(self.name, partial, &mut errors);
        let books = integer_list("books", self.books, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        let books = books.map(|mut ids| {
            ids.sort_unstable();
            ids.dedup();
            ids
        });
        Ok(LibraryChanges { name, books })
    }
}

/// Add books to a library
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LibraryBooksPayload {
    #[schema(value_type = Vec<i64>)]
    pub books: Vec<IntegerInput>,
}

impl LibraryBooksPayload {
    pub fn into_ids(self) -> Result<Vec<i64>, FieldErrors> {
        let mut errors = FieldErrors::new();
        match integer_list("books", Some(Some(self.books)), &mut errors) {
            Some(ids) => Ok(ids),
            None => Err(errors),
        }
    }
}
