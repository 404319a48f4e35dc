use async_graphql::{Context, ErrorExtensions, ID, Object, Result};

use super::errors::GqlResultExt;
use super::guards::{RoleGuard, VisitorRateLimitGuard};
use super::query::viewer;
use super::types::{
    CreateAtrocityInput, CreateGovernanceHighlightInput, UpdateAtrocityInput,
    UpdateGovernanceHighlightInput,
};
use crate::errors::CivicError;
use crate::services::AppServices;
use crate::storage::{Atrocity, GovernanceHighlight, Role, User, VisitorStats};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Count one visit. Limited per client; excess calls fail with
    /// `RATE_LIMITED` before touching the database.
    #[graphql(guard = "VisitorRateLimitGuard")]
    async fn increment_visitor_count(&self, ctx: &Context<'_>) -> Result<VisitorStats> {
        let services = ctx.data::<AppServices>()?;
        services.stats.increment_stats().await.gql()
    }

    // ---------------------------------------------------------------
    // Atrocity reports
    // ---------------------------------------------------------------

    /// Anyone may submit; new reports start unverified.
    async fn create_atrocity(
        &self,
        ctx: &Context<'_>,
        input: CreateAtrocityInput,
    ) -> Result<Atrocity> {
        let services = ctx.data::<AppServices>()?;
        let reported_by = viewer(ctx).user_id().map(str::to_string);
        services
            .atrocities
            .create(input.into(), reported_by)
            .await
            .gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Moderator)")]
    async fn update_atrocity(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateAtrocityInput,
    ) -> Result<Atrocity> {
        let services = ctx.data::<AppServices>()?;
        services.atrocities.update(&id, input.into()).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Moderator)")]
    async fn set_atrocity_verified(
        &self,
        ctx: &Context<'_>,
        id: ID,
        verified: bool,
    ) -> Result<Atrocity> {
        let services = ctx.data::<AppServices>()?;
        services.atrocities.set_verified(&id, verified).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn delete_atrocity(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let services = ctx.data::<AppServices>()?;
        services.atrocities.delete(&id).await.gql()?;
        Ok(true)
    }

    // ---------------------------------------------------------------
    // Governance highlights
    // ---------------------------------------------------------------

    #[graphql(guard = "RoleGuard::new(Role::Moderator)")]
    async fn create_governance_highlight(
        &self,
        ctx: &Context<'_>,
        input: CreateGovernanceHighlightInput,
    ) -> Result<GovernanceHighlight> {
        let services = ctx.data::<AppServices>()?;
        services.governance.create(input.into()).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Moderator)")]
    async fn update_governance_highlight(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: UpdateGovernanceHighlightInput,
    ) -> Result<GovernanceHighlight> {
        let services = ctx.data::<AppServices>()?;
        services.governance.update(&id, input.into()).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Moderator)")]
    async fn set_governance_highlight_visibility(
        &self,
        ctx: &Context<'_>,
        id: ID,
        visible: bool,
    ) -> Result<GovernanceHighlight> {
        let services = ctx.data::<AppServices>()?;
        services.governance.set_visibility(&id, visible).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Moderator)")]
    async fn set_governance_highlight_verified(
        &self,
        ctx: &Context<'_>,
        id: ID,
        verified: bool,
    ) -> Result<GovernanceHighlight> {
        let services = ctx.data::<AppServices>()?;
        services.governance.set_verified(&id, verified).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn delete_governance_highlight(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let services = ctx.data::<AppServices>()?;
        services.governance.delete(&id).await.gql()?;
        Ok(true)
    }

    // ---------------------------------------------------------------
    // User management
    // ---------------------------------------------------------------

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn update_user_role(&self, ctx: &Context<'_>, id: ID, role: Role) -> Result<User> {
        let services = ctx.data::<AppServices>()?;
        let actor = acting_user_id(ctx)?;
        services.users.update_role(&actor, &id, role).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn set_user_verified(&self, ctx: &Context<'_>, id: ID, verified: bool) -> Result<User> {
        let services = ctx.data::<AppServices>()?;
        services.users.set_verified(&id, verified).await.gql()
    }

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let services = ctx.data::<AppServices>()?;
        let actor = acting_user_id(ctx)?;
        services.users.delete(&actor, &id).await.gql()?;
        Ok(true)
    }
}

fn acting_user_id(ctx: &Context<'_>) -> Result<String> {
    viewer(ctx)
        .user_id()
        .map(str::to_string)
        .ok_or_else(|| CivicError::unauthorized("authentication required").extend())
}
