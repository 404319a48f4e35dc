//! System-level modules
//!
//! - Logging initialization
pub mod logging;

pub use logging::init_logging;
