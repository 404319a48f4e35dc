use async_graphql::{Context, ID, Object, Result};

use super::context::Viewer;
use super::errors::GqlResultExt;
use super::guards::RoleGuard;
use super::types::{
    AtrocityFilterInput, AtrocityPage, GovernanceHighlightFilterInput, GovernanceHighlightPage,
    PageInput, UserPage, page_from,
};
use crate::services::AppServices;
use crate::storage::{Atrocity, GovernanceHighlight, Role, User, VisitorStats};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Current visitor count; the counter row is created on first use.
    async fn get_visitor_stats(&self, ctx: &Context<'_>) -> Result<VisitorStats> {
        let services = ctx.data::<AppServices>()?;
        services.stats.get_stats().await.gql()
    }

    async fn atrocities(
        &self,
        ctx: &Context<'_>,
        filter: Option<AtrocityFilterInput>,
        page: Option<PageInput>,
    ) -> Result<AtrocityPage> {
        let services = ctx.data::<AppServices>()?;
        let page = page_from(page).gql()?;
        services
            .atrocities
            .list(filter.unwrap_or_default().into(), page)
            .await
            .map(AtrocityPage::from)
            .gql()
    }

    async fn atrocity(&self, ctx: &Context<'_>, id: ID) -> Result<Atrocity> {
        let services = ctx.data::<AppServices>()?;
        services.atrocities.get(&id).await.gql()
    }

    /// Hidden highlights are returned only to moderators who pass `includeHidden`.
    async fn governance_highlights(
        &self,
        ctx: &Context<'_>,
        filter: Option<GovernanceHighlightFilterInput>,
        page: Option<PageInput>,
    ) -> Result<GovernanceHighlightPage> {
        let services = ctx.data::<AppServices>()?;
        let may_see_hidden = viewer(ctx).has_role(Role::Moderator);
        let page = page_from(page).gql()?;
        services
            .governance
            .list(filter.unwrap_or_default().into_filter(may_see_hidden), page)
            .await
            .map(GovernanceHighlightPage::from)
            .gql()
    }

    async fn governance_highlight(&self, ctx: &Context<'_>, id: ID) -> Result<GovernanceHighlight> {
        let services = ctx.data::<AppServices>()?;
        let may_see_hidden = viewer(ctx).has_role(Role::Moderator);
        services.governance.get(&id, may_see_hidden).await.gql()
    }

    /// The authenticated user, or null for anonymous callers.
    async fn me(&self, ctx: &Context<'_>) -> Option<User> {
        viewer(ctx).user.clone()
    }

    #[graphql(guard = "RoleGuard::new(Role::Admin)")]
    async fn users(&self, ctx: &Context<'_>, page: Option<PageInput>) -> Result<UserPage> {
        let services = ctx.data::<AppServices>()?;
        let page = page_from(page).gql()?;
        services.users.list(page).await.map(UserPage::from).gql()
    }
}

/// 未注入 Viewer 时按匿名处理
pub(super) fn viewer<'a>(ctx: &'a Context<'_>) -> &'a Viewer {
    static ANONYMOUS: Viewer = Viewer { user: None };
    ctx.data_opt::<Viewer>().unwrap_or(&ANONYMOUS)
}
