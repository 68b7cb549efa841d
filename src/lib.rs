//! Verification and acknowledgement of Google Play in-app purchases and
//! subscriptions.
//!
//! Boot a [`Verifier`] or [`Acknowledger`] once with a service-account key,
//! then call it as often as needed. Every call returns an [`Outcome`]: either
//! a typed record ([`Receipt`], [`Subscription`]) or a [`Failure`] value.

// Library exports for testing and reuse
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{BootReason, BootRequiredError, ClientError, PlayStoreError, Result};
pub use models::{Failure, Outcome, Receipt, Subscription};
pub use services::{Acknowledger, Verifier};
