use crate::storage::{Role, User};

/// Caller identity resolved from the `Authorization: Bearer` header
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub user: Option<User>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.role().is_some_and(|r| r.at_least(required))
    }
}

/// Rate-limit key of the calling client (resolved client IP)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(pub String);

impl ClientKey {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn from_ip(ip: Option<String>) -> Self {
        Self(ip.unwrap_or_else(|| Self::UNKNOWN.to_string()))
    }
}
