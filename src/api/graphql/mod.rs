//! GraphQL schema
//!
//! Per-request data injected by the HTTP handler: [`Viewer`] (from the bearer
//! token) and [`ClientKey`] (resolved client IP). Schema-wide data:
//! [`AppServices`] and the shared [`VisitorRateLimiter`].

pub mod context;
pub mod errors;
pub mod guards;
mod mutation;
mod query;
pub mod rate_limit;
pub mod types;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};

pub use context::{ClientKey, Viewer};
pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use rate_limit::VisitorRateLimiter;

use crate::services::AppServices;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

const MAX_QUERY_DEPTH: usize = 12;
const MAX_QUERY_COMPLEXITY: usize = 500;

pub fn build_schema(services: AppServices, limiter: Arc<VisitorRateLimiter>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .data(limiter)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}
