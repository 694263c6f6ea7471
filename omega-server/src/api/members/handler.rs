//! Member API handlers

use axum::extract::{Extension, Path, State};
use axum::Json;
use validator::Validate;

use shared::models::{MemberRegister, MemberUpdate, Role, TeamMember};
use shared::{AppError, AppResult};

use crate::api::auth::{CurrentUser, require_admin, require_self_or_admin};
use crate::core::ServerState;

#[derive(serde::Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub leader_id: Option<String>,
}

/// POST /api/members - self-service registration, always starts PENDING
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<TeamMember>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let member = state
        .team
        .register(
            MemberRegister {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                role: None,
                leader_id: payload.leader_id,
            },
            None,
        )
        .await?;
    Ok(Json(member))
}

/// GET /api/members - admin sees all, a leader their team, a reseller themselves
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<TeamMember>>> {
    let members = state.team.list_members().await?;
    let visible = match user.role {
        Role::Admin => members,
        Role::Leader => members
            .into_iter()
            .filter(|m| m.id == user.id || m.leader_id.as_deref() == Some(user.id.as_str()))
            .collect(),
        Role::Reseller => members.into_iter().filter(|m| m.id == user.id).collect(),
    };
    Ok(Json(visible))
}

/// GET /api/members/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<TeamMember>> {
    let member = state.team.get_member(&id).await?;
    let allowed = user.role.is_admin()
        || user.id == member.id
        || member.leader_id.as_deref() == Some(user.id.as_str());
    if !allowed {
        return Err(AppError::forbidden("not allowed for this member"));
    }
    Ok(Json(member))
}

/// PUT /api/members/{id} - profile update, self or admin
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<TeamMember>> {
    require_self_or_admin(&user, &id)?;
    // The commission override is an admin-only management field
    if payload.custom_commission_rate.is_some() {
        require_admin(&user)?;
    }
    let member = state.team.update_profile(&id, payload).await?;
    Ok(Json(member))
}

#[derive(serde::Deserialize, Validate)]
pub struct ProofRequest {
    #[validate(url)]
    pub proof_url: String,
}

/// POST /api/members/{id}/activation-proof - attach proof, status unchanged
pub async fn submit_proof(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ProofRequest>,
) -> AppResult<Json<TeamMember>> {
    require_self_or_admin(&user, &id)?;
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let member = state
        .team
        .submit_activation_proof(&id, &payload.proof_url)
        .await?;
    Ok(Json(member))
}

#[derive(serde::Deserialize)]
pub struct ApprovalRequest {
    pub approve: bool,
}

/// POST /api/members/{id}/approval - admin decision on a pending member
pub async fn approve(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<ApprovalRequest>,
) -> AppResult<Json<TeamMember>> {
    require_admin(&user)?;
    let member = state.team.approve(&id, payload.approve, &user.id).await?;
    Ok(Json(member))
}
