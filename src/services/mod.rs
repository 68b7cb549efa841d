// Service modules
pub mod acknowledger;
pub mod google_play_client;
mod lifecycle;
pub mod operation;
pub mod publisher_client;
pub mod verifier;


pub use acknowledger::Acknowledger;
pub use google_play_client::{ClientSettings, GooglePlayClient, GooglePlayConnector, ServiceAccountKey};
pub use operation::{
    Acknowledgement, Operation, PurchaseTarget, SubscriptionAcknowledgement,
    SubscriptionVerification, Verification,
};
pub use publisher_client::{Connector, PublisherClient};
pub use verifier::Verifier;
