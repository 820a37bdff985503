//! Edit permission as reported by the server.
//!
//! Holding a token proves nothing on its own: it may be expired, revoked, or
//! belong to a viewer. The site asks `GET /api/auth/me` and only reflects
//! the answer.

use async_trait::async_trait;
use carlton_core::user::{Role, User};
use serde::Deserialize;

use crate::error::ClientError;

/// Body of `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub can_edit: bool,
}

#[async_trait]
pub trait SessionProbe: Send + Sync {
    async fn session(&self, token: &str) -> Result<SessionInfo, ClientError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Permission {
    Anonymous,
    /// Signed in without edit rights.
    ReadOnly(Option<User>),
    CanEdit(Option<User>),
}

impl Permission {
    pub fn can_edit(&self) -> bool {
        matches!(self, Permission::CanEdit(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Permission::Anonymous => None,
            Permission::ReadOnly(user) | Permission::CanEdit(user) => user.as_ref(),
        }
    }
}

impl From<SessionInfo> for Permission {
    fn from(info: SessionInfo) -> Self {
        if info.can_edit {
            Permission::CanEdit(info.user)
        } else if info.user.is_some() || info.role.is_some() {
            Permission::ReadOnly(info.user)
        } else {
            Permission::Anonymous
        }
    }
}

/// Ask the server what `token` may do. No token means no request; a failed
/// request means no permission.
pub async fn resolve_permission(probe: &dyn SessionProbe, token: Option<&str>) -> Permission {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return Permission::Anonymous;
    };
    match probe.session(token).await {
        Ok(info) => info.into(),
        Err(err) => {
            tracing::warn!("could not confirm session, editing disabled: {err}");
            Permission::Anonymous
        }
    }
}
