//! Librarian model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{check_name, integer, required, IntegerInput, Nullable};
use crate::error::FieldErrors;

/// Librarian row; each library has at most one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Librarian {
    pub id: i64,
    pub name: String,
    /// Library id
    #[sqlx(rename = "library_id")]
    pub library: i64,
}

/// Create/update librarian request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LibrarianPayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Nullable<String>,
    /// Library id
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i64>)]
    pub library: Nullable<IntegerInput>,
}

/// Validated librarian fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarianChanges {
    pub name: Option<String>,
    pub library_id: Option<i64>,
}

impl LibrarianPayload {
    pub fn into_changes(self, partial: bool) -> Result<LibrarianChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = check_name(self.name, partial, &mut errors);
        let library_id = integer("library", self.library, &mut errors);
        let library_id = if partial {
            library_id
        } else {
            required("library", library_id, &mut errors)
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LibrarianChanges { name, library_id })
    }
}
