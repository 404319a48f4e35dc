//! Service layer for business logic
//!
//! Shared by the GraphQL resolvers, the REST auth endpoints and the CLI.

mod atrocity_service;
mod governance_service;
mod stats_service;
mod user_service;
pub mod validation;

use std::sync::Arc;

pub use atrocity_service::*;
pub use governance_service::*;
pub use stats_service::*;
pub use user_service::*;

use crate::storage::SeaOrmStorage;

/// All services over one storage handle
#[derive(Clone)]
pub struct AppServices {
    pub stats: Arc<StatsService>,
    pub atrocities: Arc<AtrocityService>,
    pub governance: Arc<GovernanceService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            stats: Arc::new(StatsService::new(storage.clone())),
            atrocities: Arc::new(AtrocityService::new(storage.clone())),
            governance: Arc::new(GovernanceService::new(storage.clone())),
            users: Arc::new(UserService::new(storage)),
        }
    }
}
