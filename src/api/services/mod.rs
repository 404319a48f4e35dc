pub mod auth;
pub mod graphql;
pub mod health;
mod helpers;
pub mod types;

pub use auth::{AuthGovernorConfig, auth_governor_config, auth_routes, json_error_handler};
pub use graphql::graphql_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use types::{ApiResponse, ErrorCode};
