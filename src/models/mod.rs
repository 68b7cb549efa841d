// Purchase-state domain model
pub mod common;
pub mod failure;
pub mod purchase;
pub mod subscription;

pub use common::{
    AcknowledgementState, CancelReason, ConsumptionState, PaymentState, PurchaseState,
};
pub use failure::{Failure, Outcome};
pub use purchase::{ProductPurchase, Receipt};
pub use subscription::{Subscription, SubscriptionPurchase};
