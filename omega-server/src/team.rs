//! Team service: registration and the activation/approval state machine
//!
//! A registered member starts `PENDING`. Attaching activation proof never
//! changes status; only a human approval decision moves the member to
//! `ACTIVE` or `REJECTED`, and neither outcome ever returns to `PENDING`.

use shared::models::{
    AuditAction, MemberRegister, MemberStatus, MemberUpdate, Role, TeamMember,
};
use shared::util::{new_id, now_millis};
use shared::{AppError, AppResult};

use crate::audit::AuditTrail;
use crate::services::{MessageKind, Notifier};
use crate::store::Ledger;

#[derive(Clone)]
pub struct TeamService {
    ledger: Ledger,
    audit: AuditTrail,
    notifier: Notifier,
}

impl TeamService {
    pub fn new(ledger: Ledger, audit: AuditTrail, notifier: Notifier) -> Self {
        Self {
            ledger,
            audit,
            notifier,
        }
    }

    /// Register a new member in `PENDING` state.
    ///
    /// `actor_id` is the operator creating the account; self-registration
    /// passes `None` and the new member id is used for the audit entry.
    pub async fn register(
        &self,
        payload: MemberRegister,
        actor_id: Option<&str>,
    ) -> AppResult<TeamMember> {
        let now = now_millis();
        let member = TeamMember {
            id: new_id(),
            name: payload.name,
            role: payload.role.unwrap_or(Role::Reseller),
            status: MemberStatus::Pending,
            wallet: 0.0,
            points: 0,
            sales_this_month: 0.0,
            level: 1,
            email: payload.email,
            phone: payload.phone,
            cbu: None,
            alias: None,
            leader_id: payload.leader_id,
            custom_commission_rate: None,
            activation_proof_url: None,
            join_date: now,
            updated_at: now,
        };
        self.ledger.put(&member).await?;

        let actor = actor_id.unwrap_or(&member.id);
        self.audit
            .append(
                actor,
                AuditAction::MemberAdded,
                format!("Member registered: {} ({:?})", member.name, member.role),
                None,
            )
            .await?;

        tracing::info!(member = %member.id, name = %member.name, "member registered");
        Ok(member)
    }

    pub async fn get_member(&self, id: &str) -> AppResult<TeamMember> {
        self.ledger
            .get(id)
            .await?
            .ok_or_else(|| AppError::unknown_member(id))
    }

    pub async fn list_members(&self) -> AppResult<Vec<TeamMember>> {
        let mut members: Vec<TeamMember> = self.ledger.list().await?;
        members.sort_by(|a, b| a.join_date.cmp(&b.join_date));
        Ok(members)
    }

    /// Attach the activation proof screenshot. Status stays `PENDING`;
    /// approval is a separate human decision.
    pub async fn submit_activation_proof(
        &self,
        member_id: &str,
        proof_url: &str,
    ) -> AppResult<TeamMember> {
        let proof = proof_url.to_string();
        self.ledger
            .mutate::<TeamMember, _>(member_id, |m| {
                if m.status != MemberStatus::Pending {
                    return Err(AppError::invalid_transition(format!(
                        "activation proof can only be attached while PENDING, member is {:?}",
                        m.status
                    )));
                }
                m.activation_proof_url = Some(proof.clone());
                m.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unknown_member(member_id),
                e => e,
            })
    }

    /// Decide a pending member's fate: `PENDING → ACTIVE` or
    /// `PENDING → REJECTED`.
    ///
    /// Deciding an already-decided member fails with `InvalidTransition`; a
    /// member never returns to `PENDING`. Approval fires the welcome
    /// notification without blocking on its delivery.
    pub async fn approve(
        &self,
        member_id: &str,
        approved: bool,
        actor_id: &str,
    ) -> AppResult<TeamMember> {
        let updated = self
            .ledger
            .mutate::<TeamMember, _>(member_id, |m| {
                if m.status != MemberStatus::Pending {
                    return Err(AppError::invalid_transition(format!(
                        "member {} is already {:?}",
                        m.id, m.status
                    )));
                }
                m.status = if approved {
                    MemberStatus::Active
                } else {
                    MemberStatus::Rejected
                };
                m.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unknown_member(member_id),
                e => e,
            })?;

        let (action, verdict) = if approved {
            (AuditAction::MemberApproved, "approved")
        } else {
            (AuditAction::MemberRejected, "rejected")
        };
        self.audit
            .append(
                actor_id,
                action,
                format!("Member {} {}", updated.name, verdict),
                updated.activation_proof_url.clone(),
            )
            .await?;

        tracing::info!(member = member_id, verdict, "activation decided");

        if approved {
            self.notifier
                .dispatch(&updated, MessageKind::Welcome, None);
        }

        Ok(updated)
    }

    /// Update profile fields (None = leave unchanged)
    pub async fn update_profile(
        &self,
        member_id: &str,
        patch: MemberUpdate,
    ) -> AppResult<TeamMember> {
        self.ledger
            .mutate::<TeamMember, _>(member_id, |m| {
                if let Some(v) = &patch.name {
                    m.name = v.clone();
                }
                if let Some(v) = &patch.email {
                    m.email = Some(v.clone());
                }
                if let Some(v) = &patch.phone {
                    m.phone = Some(v.clone());
                }
                if let Some(v) = &patch.cbu {
                    m.cbu = Some(v.clone());
                }
                if let Some(v) = &patch.alias {
                    m.alias = Some(v.clone());
                }
                if let Some(v) = &patch.leader_id {
                    m.leader_id = Some(v.clone());
                }
                if let Some(v) = patch.custom_commission_rate {
                    m.custom_commission_rate = Some(v);
                }
                m.updated_at = now_millis();
                Ok(())
            })
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unknown_member(member_id),
                e => e,
            })
    }
}
