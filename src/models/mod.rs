//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod librarian;
pub mod library;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail};
pub use book::{Book, BookRecord};
pub use librarian::Librarian;
pub use library::{Library, LibraryDetail};
pub use user::{Permission, Role, User, UserClaims};

use serde::{de::IgnoredAny, Deserialize};
use validator::Validate;

use crate::error::FieldErrors;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const NOT_NULL: &str = "This field may not be null.";
pub(crate) const INVALID_INTEGER: &str = "A valid integer is required.";

/// Request field as sent: `None` when absent, `Some(None)` for an explicit null.
/// Deserialize with `serde_with::rust::double_option`.
pub type Nullable<T> = Option<Option<T>>;

/// Integer field that also accepts a numeric string such as `"1990"`.
/// Anything else is kept so it can be reported against its field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    Number(i64),
    Text(String),
    Other(IgnoredAny),
}

impl IntegerInput {
    pub fn parse<T: TryFrom<i64>>(&self) -> Option<T> {
        let value: i64 = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
            Self::Other(_) => return None,
        };
        T::try_from(value).ok()
    }
}

impl From<i64> for IntegerInput {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Record a "required" error when `value` is missing and the field has no
/// other error yet
pub(crate) fn required<T>(field: &str, value: Option<T>, errors: &mut FieldErrors) -> Option<T> {
    if value.is_none() && errors.get(field).is_none() {
        errors.add(field, REQUIRED);
    }
    value
}

/// Unwrap a supplied value, reporting an explicit null
pub(crate) fn non_null<T>(field: &str, value: Nullable<T>, errors: &mut FieldErrors) -> Option<T> {
    match value {
        Some(None) => {
            errors.add(field, NOT_NULL);
            None
        }
        Some(Some(value)) => Some(value),
        None => None,
    }
}

pub(crate) fn integer<T: TryFrom<i64>>(
    field: &str,
    value: Nullable<IntegerInput>,
    errors: &mut FieldErrors,
) -> Option<T> {
    let parsed = non_null(field, value, errors)?.parse();
    if parsed.is_none() {
        errors.add(field, INVALID_INTEGER);
    }
    parsed
}

/// List of ids; one message for the field however many entries are bad
pub(crate) fn integer_list(
    field: &str,
    value: Nullable<Vec<IntegerInput>>,
    errors: &mut FieldErrors,
) -> Option<Vec<i64>> {
    let parsed = non_null(field, value, errors)?
        .iter()
        .map(|input| input.parse::<i64>())
        .collect::<Option<Vec<i64>>>();
    if parsed.is_none() {
        errors.add(field, INVALID_INTEGER);
    }
    parsed
}

pub(crate) fn check_not_blank(field: &str, value: &str, errors: &mut FieldErrors) {
    if value.is_empty() {
        errors.add(field, BLANK);
    }
}

pub(crate) fn trimmed(value: String) -> String {
    value.trim().to_string()
}

#[derive(Validate)]
struct NameField {
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    name: Option<String>,
}

/// Trim the supplied name, then apply the null, blank, length and required rules
pub(crate) fn check_name(name: Nullable<String>, partial: bool, errors: &mut FieldErrors) -> Option<String> {
    let field = NameField {
        name: non_null("name", name, errors).map(trimmed),
    };
    if let Some(ref value) = field.name {
        check_not_blank("name", value, errors);
    }
    if let Err(e) = field.validate() {
        errors.merge(e.into());
    }
    if partial {
        field.name
    } else {
        required("name", field.name, errors)
    }
}
