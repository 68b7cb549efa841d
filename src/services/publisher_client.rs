use std::path::Path;

use async_trait::async_trait;

use crate::{
    error::{ClientError, Result},
    models::{ProductPurchase, SubscriptionPurchase},
};

/// Remote calls against the Play Developer API purchase endpoints.
///
/// Implementations report every non-success outcome as a [`ClientError`];
/// operations are responsible for turning it into a `Failure` value.
#[async_trait]
pub trait PublisherClient: Send + Sync {
    async fn verify(
        &self,
        package: &str,
        product_id: &str,
        token: &str,
    ) -> std::result::Result<ProductPurchase, ClientError>;

    async fn verify_subscription(
        &self,
        package: &str,
        subscription_id: &str,
        token: &str,
    ) -> std::result::Result<SubscriptionPurchase, ClientError>;

    /// Acknowledges a product purchase and returns its refreshed state
    async fn acknowledge(
        &self,
        package: &str,
        product_id: &str,
        token: &str,
    ) -> std::result::Result<ProductPurchase, ClientError>;

    /// Acknowledges a subscription purchase. Google answers with an empty body.
    async fn acknowledge_subscription_purchase(
        &self,
        package: &str,
        subscription_id: &str,
        token: &str,
    ) -> std::result::Result<(), ClientError>;
}

/// Builds an authorized [`PublisherClient`] from a credentials file.
///
/// Called exactly once per facade, from `boot()`. Authorization failures are
/// returned to the caller of `boot()` as-is.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: PublisherClient;

    async fn connect(&self, config_key_path: &Path) -> Result<Self::Client>;
}
