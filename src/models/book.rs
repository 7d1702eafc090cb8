//! Book model, request payloads and field validation

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{check_not_blank, integer, non_null, required, trimmed, IntegerInput, Nullable};
use crate::error::FieldErrors;

/// Book as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub publication_year: i32,
    /// Author id
    #[sqlx(rename = "author_id")]
    pub author: i64,
}

/// Book joined with its author's name; the unit the list pipeline filters on
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookRecord {
    #[sqlx(flatten)]
    pub book: Book,
    pub author_name: String,
}

/// Create/update request body. Every field is optional at the wire level so
/// that PATCH and PUT share one shape; PUT and POST then require all of them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookPayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Nullable<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Nullable<IntegerInput>,
    /// Author id
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i64>)]
    pub author: Nullable<IntegerInput>,
}

/// Supplied fields once nulls and type mismatches are set aside
#[derive(Debug, Default, Validate)]
struct BookFields {
    #[validate(length(max = 200, message = "Ensure this field has no more than 200 characters."))]
    title: Option<String>,
    publication_year: Option<i32>,
    author: Option<i64>,
}

/// Fully specified book fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub publication_year: i32,
    pub author_id: i64,
}

/// Validated subset of book fields to merge into an existing row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author_id: Option<i64>,
}

impl BookChanges {
    pub fn apply(&self, book: &Book) -> NewBook {
        NewBook {
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
            publication_year: self.publication_year.unwrap_or(book.publication_year),
            author_id: self.author_id.unwrap_or(book.author),
        }
    }
}

impl From<NewBook> for BookChanges {
    fn from(book: NewBook) -> Self {
        Self {
            title: Some(book.title),
            publication_year: Some(book.publication_year),
            author_id: Some(book.author_id),
        }
    }
}

impl BookPayload {
    /// Checks every field that was supplied
    fn check_supplied(self) -> (BookFields, FieldErrors) {
        let mut errors = FieldErrors::new();
        let fields = BookFields {
            title: non_null("title", self.title, &mut errors).map(trimmed),
            publication_year: integer("publication_year", self.publication_year, &mut errors),
            author: integer("author", self.author, &mut errors),
        };

        if let Err(e) = fields.validate() {
            errors.merge(e.into());
        }
        if let Some(ref title) = fields.title {
            check_not_blank("title", title, &mut errors);
        }
        if let Some(year) = fields.publication_year {
            if let Err(message) = validate_publication_year(year) {
                errors.add("publication_year", message);
            }
        }
        (fields, errors)
    }

    /// POST and PUT: every field must be present and valid
    pub fn into_new_book(self) -> Result<NewBook, FieldErrors> {
        let (fields, mut errors) = self.check_supplied();
        let title = required("title", fields.title, &mut errors);
        let publication_year = required("publication_year", fields.publication_year, &mut errors);
        let author_id = required("author", fields.author, &mut errors);

        match (title, publication_year, author_id) {
            (Some(title), Some(publication_year), Some(author_id)) if errors.is_empty() => Ok(NewBook {
                title,
                publication_year,
                author_id,
            }),
            _ => Err(errors),
        }
    }

    /// PATCH: only supplied fields are checked and changed
    pub fn into_changes(self) -> Result<BookChanges, FieldErrors> {
        let (fields, errors) = self.check_supplied();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(BookChanges {
            title: fields.title,
            publication_year: fields.publication_year,
            author_id: fields.author,
        })
    }
}

/// Calendar year on the local wall clock, read on every call
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Reject publication years after the current year. Arbitrarily old years pass.
pub fn validate_publication_year(value: i32) -> Result<i32, String> {
    check_publication_year(value, current_year())
}

pub fn check_publication_year(value: i32, current_year: i32) -> Result<i32, String> {
    if value > current_year {
        return Err(format!(
            "Publication year cannot be in the future. Current year is {}.",
            current_year
        ));
    }
    Ok(value)
}
