//! Shared fixtures for unit tests

use std::sync::Arc;

use shared::models::{Environment, MemberStatus, Role, TeamMember};
use shared::util::now_millis;

use crate::audit::AuditTrail;
use crate::commission::CommissionPolicy;
use crate::orders::OrderManager;
use crate::payouts::PayoutProcessor;
use crate::rewards::{RedemptionEngine, RedemptionPolicy};
use crate::sales::SaleRecorder;
use crate::services::{LogNotifier, Notifier};
use crate::settings::SettingsService;
use crate::store::{Ledger, MemoryStore};
use crate::team::TeamService;

pub fn mem_ledger() -> Ledger {
    Ledger::new(Arc::new(MemoryStore::new()))
}

pub fn audit_trail(ledger: &Ledger) -> AuditTrail {
    AuditTrail::new(ledger.clone(), Environment::Simulation)
}

pub fn settings_service(ledger: &Ledger) -> SettingsService {
    SettingsService::new(ledger.clone(), audit_trail(ledger))
}

pub fn notifier(ledger: &Ledger) -> Notifier {
    Notifier::new(Arc::new(LogNotifier), settings_service(ledger))
}

pub fn test_member(id: &str, wallet: f64, points: i64) -> TeamMember {
    let now = now_millis();
    TeamMember {
        id: id.to_string(),
        name: format!("Member {id}"),
        role: Role::Reseller,
        status: MemberStatus::Active,
        wallet,
        points,
        sales_this_month: 0.0,
        level: 1,
        email: None,
        phone: None,
        cbu: None,
        alias: None,
        leader_id: None,
        custom_commission_rate: None,
        activation_proof_url: None,
        join_date: now,
        updated_at: now,
    }
}

pub async fn seed_member(ledger: &Ledger, member: TeamMember) {
    ledger.put(&member).await.unwrap();
}

pub fn recorder() -> (Ledger, AuditTrail, SaleRecorder) {
    let ledger = mem_ledger();
    let audit = audit_trail(&ledger);
    let sales = SaleRecorder::new(
        ledger.clone(),
        audit.clone(),
        CommissionPolicy::default(),
        notifier(&ledger),
    );
    (ledger, audit, sales)
}

pub fn payout_processor() -> (Ledger, AuditTrail, SettingsService, PayoutProcessor) {
    let ledger = mem_ledger();
    let audit = audit_trail(&ledger);
    let settings = settings_service(&ledger);
    let payouts = PayoutProcessor::new(
        ledger.clone(),
        audit.clone(),
        settings.clone(),
        notifier(&ledger),
    );
    (ledger, audit, settings, payouts)
}

pub fn redemption_engine() -> (Ledger, AuditTrail, RedemptionEngine) {
    let ledger = mem_ledger();
    let audit = audit_trail(&ledger);
    let rewards = RedemptionEngine::new(
        ledger.clone(),
        audit.clone(),
        RedemptionPolicy::default(),
    );
    (ledger, audit, rewards)
}

pub fn team_service() -> (Ledger, AuditTrail, TeamService) {
    let ledger = mem_ledger();
    let audit = audit_trail(&ledger);
    let team = TeamService::new(ledger.clone(), audit.clone(), notifier(&ledger));
    (ledger, audit, team)
}

pub fn order_manager() -> (Ledger, AuditTrail, OrderManager) {
    let ledger = mem_ledger();
    let audit = audit_trail(&ledger);
    let settings = settings_service(&ledger);
    let sales = SaleRecorder::new(
        ledger.clone(),
        audit.clone(),
        CommissionPolicy::default(),
        notifier(&ledger),
    );
    let orders = OrderManager::new(ledger.clone(), sales, settings, audit.clone());
    (ledger, audit, orders)
}
