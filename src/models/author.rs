//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{book::Book, check_name, Nullable};
use crate::error::FieldErrors;

/// Author row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Author with nested (read-only) books, in default book order
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDetail {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            books,
        }
    }
}

/// Create/update author request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthorPayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Nullable<String>,
}

impl AuthorPayload {
    /// Validated name. `partial` lets PATCH omit it.
    pub fn into_name(self, partial: bool) -> Result<Option<String>, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = check_name(self.name, partial, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(name)
    }
}
