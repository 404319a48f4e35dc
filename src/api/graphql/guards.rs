use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Guard, Result};
use tracing::info;

use super::context::{ClientKey, Viewer};
use super::errors::rate_limited_error;
use super::rate_limit::{VisitorRateLimiter, retry_after_secs};
use crate::errors::CivicError;
use crate::storage::Role;

/// Requires an authenticated viewer with at least `required` role
pub struct RoleGuard {
    required: Role,
}

impl RoleGuard {
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

impl Guard for RoleGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let viewer = ctx.data_opt::<Viewer>();
        match viewer.and_then(|v| v.role()) {
            None => Err(CivicError::unauthorized("authentication required").extend()),
            Some(role) if !role.at_least(self.required) => Err(CivicError::forbidden(format!(
                "{} role required",
                self.required
            ))
            .extend()),
            Some(_) => Ok(()),
        }
    }
}

/// Rejects `incrementVisitorCount` calls over the per-client quota
pub struct VisitorRateLimitGuard;

impl Guard for VisitorRateLimitGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let limiter = ctx.data::<Arc<VisitorRateLimiter>>()?;
        let client = ctx
            .data_opt::<ClientKey>()
            .map(|c| c.0.as_str())
            .unwrap_or(ClientKey::UNKNOWN);

        limiter.check(client).map_err(|wait| {
            let retry_after = retry_after_secs(wait);
            info!(client, retry_after, "incrementVisitorCount rate limited");
            rate_limited_error(retry_after)
        })
    }
}
