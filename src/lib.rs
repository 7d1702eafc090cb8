//! Bookshelf server
//!
//! A REST JSON API over a small library catalog: books, authors, libraries
//! and librarians, with filtered/searchable/orderable book listings and
//! token-authenticated writes.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
