//! CLI command implementations

mod config_generate;
mod create_admin;
mod seed;

pub use config_generate::config_generate;
pub use create_admin::create_admin;
pub use seed::seed;
