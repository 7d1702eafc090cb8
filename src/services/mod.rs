//! Business logic services

pub mod catalog;
pub mod libraries;
pub mod query;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub libraries: libraries::LibrariesService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            libraries: libraries::LibrariesService::new(repository.clone()),
            users: users::UsersService::new(repository, auth_config),
        }
    }
}
