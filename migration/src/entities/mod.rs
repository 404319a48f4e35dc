pub mod atrocity;
pub mod governance_highlight;
pub mod user;
pub mod visitor_stats;

pub use atrocity::Entity as AtrocityEntity;
pub use governance_highlight::Entity as GovernanceHighlightEntity;
pub use user::Entity as UserEntity;
pub use visitor_stats::Entity as VisitorStatsEntity;
