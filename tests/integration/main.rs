//! API integration tests against an in-memory database

mod auth;
mod authors;
mod books;
