use std::sync::Arc;

use shared::models::{AuditAction, GlobalSettings, MemberStatus, Role, TeamMember};
use shared::util::now_millis;
use shared::AppResult;

use crate::audit::AuditTrail;
use crate::core::{Config, StoreBackend};
use crate::orders::OrderManager;
use crate::payouts::PayoutProcessor;
use crate::rewards::RedemptionEngine;
use crate::sales::SaleRecorder;
use crate::services::{
    CloudinaryHost, CorreoQuoter, FlatRateQuoter, HttpMarkupAdvisor, ImageHost, LogNotifier,
    MarkupAdvisor, Notifier, PaymentGateway, ShippingQuoter, SimulatedAdvisor, SimulatedGateway,
    UnconfiguredImageHost,
};
use crate::settings::SettingsService;
use crate::store::{DocumentStore, Ledger, MemoryStore, SETTINGS_ID, SurrealStore};
use crate::team::TeamService;

/// Fallback admin account created on an empty ledger
const DEFAULT_ADMIN_ID: &str = "admin";

/// Server state: shared references to every service
///
/// Cheap to clone; everything inside is an `Arc` or holds one.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub ledger: Ledger,
    pub audit: AuditTrail,
    pub settings: SettingsService,
    pub team: TeamService,
    pub sales: SaleRecorder,
    pub orders: OrderManager,
    pub payouts: PayoutProcessor,
    pub rewards: RedemptionEngine,
    pub gateway: Arc<dyn PaymentGateway>,
    pub shipping: Arc<dyn ShippingQuoter>,
    pub markup: Arc<dyn MarkupAdvisor>,
    pub images: Arc<dyn ImageHost>,
}

impl ServerState {
    /// Bind the configured store backend and build all services
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Memory => {
                tracing::info!("ledger store: in-memory");
                Arc::new(MemoryStore::new())
            }
            StoreBackend::Surreal => {
                let path = format!("{}/ledger.db", config.work_dir);
                tracing::info!(%path, "ledger store: embedded SurrealDB");
                Arc::new(SurrealStore::open(&path).await?)
            }
        };
        Self::with_store(config.clone(), store).await
    }

    /// Build services over an already-bound store (used by tests)
    pub async fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let ledger = Ledger::new(store);
        let audit = AuditTrail::new(ledger.clone(), config.environment);
        let settings = SettingsService::new(ledger.clone(), audit.clone());
        let notifier = Notifier::new(Arc::new(LogNotifier), settings.clone());
        let sales = SaleRecorder::new(
            ledger.clone(),
            audit.clone(),
            config.commission_policy(),
            notifier.clone(),
        );
        let orders = OrderManager::new(
            ledger.clone(),
            sales.clone(),
            settings.clone(),
            audit.clone(),
        );
        let payouts = PayoutProcessor::new(
            ledger.clone(),
            audit.clone(),
            settings.clone(),
            notifier.clone(),
        );
        let rewards = RedemptionEngine::new(
            ledger.clone(),
            audit.clone(),
            config.redemption_policy(),
        );
        let team = TeamService::new(ledger.clone(), audit.clone(), notifier);

        let gateway: Arc<dyn PaymentGateway> = Arc::new(SimulatedGateway);
        let shipping: Arc<dyn ShippingQuoter> = match &config.shipping_api_url {
            Some(url) => Arc::new(CorreoQuoter::new(url.clone())),
            None => Arc::new(FlatRateQuoter::default()),
        };
        let markup: Arc<dyn MarkupAdvisor> = match &config.markup_api_url {
            Some(url) => Arc::new(HttpMarkupAdvisor::new(url.clone())),
            None => Arc::new(SimulatedAdvisor),
        };
        let images: Arc<dyn ImageHost> = match (
            &config.cloudinary_cloud_name,
            &config.cloudinary_upload_preset,
        ) {
            (Some(cloud), Some(preset)) => {
                Arc::new(CloudinaryHost::new(cloud.clone(), preset.clone()))
            }
            _ => Arc::new(UnconfiguredImageHost),
        };

        let state = Self {
            config,
            ledger,
            audit,
            settings,
            team,
            sales,
            orders,
            payouts,
            rewards,
            gateway,
            shipping,
            markup,
            images,
        };
        state.seed_defaults().await?;
        Ok(state)
    }

    /// First-run seeding: settings singleton and a fallback admin account
    async fn seed_defaults(&self) -> AppResult<()> {
        if self
            .ledger
            .get::<GlobalSettings>(SETTINGS_ID)
            .await?
            .is_none()
        {
            self.ledger.put(&GlobalSettings::default()).await?;
            tracing::info!("seeded default settings");
        }

        let members: Vec<TeamMember> = self.ledger.list().await?;
        if !members.iter().any(|m| m.role.is_admin()) {
            let now = now_millis();
            let admin = TeamMember {
                id: DEFAULT_ADMIN_ID.to_string(),
                name: "Platform Admin".to_string(),
                role: Role::Admin,
                status: MemberStatus::Active,
                wallet: 0.0,
                points: 0,
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
            };
            self.ledger.put(&admin).await?;
            self.audit
                .append(
                    DEFAULT_ADMIN_ID,
                    AuditAction::MemberAdded,
                    "Fallback admin account created",
                    None,
                )
                .await?;
            tracing::warn!(
                id = DEFAULT_ADMIN_ID,
                "no admin found, seeded fallback admin account"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_seeds_admin_and_settings() {
        let state = ServerState::with_store(
            Config::default(),
            Arc::new(MemoryStore::new()),
        )
        .await
        .unwrap();

        let admin: TeamMember = state.ledger.get(DEFAULT_ADMIN_ID).await.unwrap().unwrap();
        assert!(admin.role.is_admin());
        assert_eq!(admin.status, MemberStatus::Active);

        let settings = state.settings.get().await.unwrap();
        assert_eq!(settings.default_commission_rate, 5.0);
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let state = ServerState::with_store(Config::default(), store.clone())
            .await
            .unwrap();
        let before = state.audit.list(None).await.unwrap().len();

        // A second boot over the same store must not seed again
        let state = ServerState::with_store(Config::default(), store).await.unwrap();
        let after = state.audit.list(None).await.unwrap().len();
        assert_eq!(before, after);
    }
}
