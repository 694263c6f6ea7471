//! Request identity
//!
//! Authentication itself is an external collaborator; this middleware only
//! resolves the caller id the visibility rules need. Requests carry
//! `X-Member-Id`, resolved against the ledger into a [`CurrentUser`]
//! request extension.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use shared::models::{MemberStatus, Role, TeamMember};
use shared::{AppError, AppResult};

use crate::core::ServerState;

pub const MEMBER_HEADER: &str = "x-member-id";

/// Resolved caller identity
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

pub async fn identify(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let member_id = request
        .headers()
        .get(MEMBER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)?;

    let member: TeamMember = state
        .ledger
        .get(&member_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    if member.status == MemberStatus::Rejected {
        return Err(AppError::forbidden("account rejected"));
    }

    request.extensions_mut().insert(CurrentUser {
        id: member.id.clone(),
        name: member.name.clone(),
        role: member.role,
    });
    Ok(next.run(request).await)
}

pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("admin role required"))
    }
}

pub fn require_self_or_admin(user: &CurrentUser, member_id: &str) -> AppResult<()> {
    if user.role.is_admin() || user.id == member_id {
        Ok(())
    } else {
        Err(AppError::forbidden("not allowed for this member"))
    }
}
