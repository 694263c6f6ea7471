//! Notification channel collaborator
//!
//! Delivery is fire-and-forget: a failed notification is logged and never
//! rolls back the approval/sale/payout that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::TeamMember;
use shared::AppResult;

use crate::settings::SettingsService;

/// Which settings template a message is rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Welcome,
    SaleRecorded,
    PayoutSent,
}

/// Outbound messaging transport (WhatsApp bridge, email relay, ...)
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn deliver(
        &self,
        member: &TeamMember,
        kind: MessageKind,
        message: String,
    ) -> AppResult<()>;
}

/// tracing-backed channel for offline/demo use
pub struct LogNotifier;

#[async_trait]
impl NotificationChannel for LogNotifier {
    async fn deliver(
        &self,
        member: &TeamMember,
        kind: MessageKind,
        message: String,
    ) -> AppResult<()> {
        tracing::info!(
            member = %member.id,
            kind = ?kind,
            %message,
            "notification dispatched"
        );
        Ok(())
    }
}

/// Render `{{name}}`, `{{platform}}` and `{{amount}}` placeholders
pub fn render_template(
    template: &str,
    name: &str,
    platform: &str,
    amount: Option<f64>,
) -> String {
    let mut message = template
        .replace("{{name}}", name)
        .replace("{{platform}}", platform);
    if let Some(amount) = amount {
        message = message.replace("{{amount}}", &format!("{amount}"));
    }
    message
}

/// Fire-and-forget dispatcher over a [`NotificationChannel`]
///
/// `dispatch` spawns delivery in the background; the triggering operation
/// observes the transition, never the delivery outcome.
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn NotificationChannel>,
    settings: SettingsService,
}

impl Notifier {
    pub fn new(channel: Arc<dyn NotificationChannel>, settings: SettingsService) -> Self {
        Self { channel, settings }
    }

    pub fn dispatch(&self, member: &TeamMember, kind: MessageKind, amount: Option<f64>) {
        let channel = self.channel.clone();
        let settings = self.settings.clone();
        let member = member.clone();
        tokio::spawn(async move {
            let settings = match settings.get().await {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(member = %member.id, error = %e, "notification skipped: settings unavailable");
                    return;
                }
            };
            let template = match kind {
                MessageKind::Welcome => &settings.templates.welcome,
                MessageKind::SaleRecorded => &settings.templates.sale,
                MessageKind::PayoutSent => &settings.templates.payout,
            };
            let message =
                render_template(template, &member.name, &settings.platform_name, amount);
            if let Err(e) = channel.deliver(&member, kind, message).await {
                tracing::warn!(member = %member.id, error = %e, "notification delivery failed");
            }
        });
    }
}
