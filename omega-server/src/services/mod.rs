//! External collaborator interfaces
//!
//! The Core consumes these behind narrow traits; concrete transports are
//! replaceable at startup and none of them participate in ledger
//! transactions.

pub mod images;
pub mod markup;
pub mod notification;
pub mod payment;
pub mod shipping;

pub use images::{CloudinaryHost, ImageHost, UnconfiguredImageHost};
pub use markup::{HttpMarkupAdvisor, MarkupAdvisor, MarkupSuggestion, SimulatedAdvisor};
pub use notification::{LogNotifier, MessageKind, NotificationChannel, Notifier};
pub use payment::{ChargeOutcome, ChargeRequest, PaymentGateway, SimulatedGateway};
pub use shipping::{CorreoQuoter, FlatRateQuoter, ShippingQuote, ShippingQuoter};
