//! One-shot calls against a booted [`PublisherClient`].
//!
//! An [`Operation`] binds a client to a package/item/token triple and performs
//! exactly one remote call when [`Operation::execute`] is awaited. Which call,
//! and how a success is wrapped, is decided by the [`Call`] marker it is
//! parameterized over.

use std::marker::PhantomData;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    models::{Outcome, Receipt, Subscription},
    services::publisher_client::PublisherClient,
    utils::token_fingerprint,
};

/// The identifiers a single purchase is looked up by
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseTarget {
    pub package: String,
    pub product_id: String,
    pub token: String,
}

impl PurchaseTarget {
    pub fn new(
        package: impl Into<String>,
        product_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            product_id: product_id.into(),
            token: token.into(),
        }
    }
}

/// Selects the remote method an [`Operation`] invokes and its success type
#[async_trait]
pub trait Call: Send + Sync + 'static {
    type Output: Send;

    /// Name used in logs
    const NAME: &'static str;

    async fn invoke<C>(
        client: &C,
        target: &PurchaseTarget,
    ) -> Result<Self::Output, ClientError>
    where
        C: PublisherClient + ?Sized;
}

#[derive(Debug, Clone, Copy)]
pub struct VerifyProduct;

#[derive(Debug, Clone, Copy)]
pub struct VerifySubscription;

#[derive(Debug, Clone, Copy)]
pub struct AcknowledgeProduct;

#[derive(Debug, Clone, Copy)]
pub struct AcknowledgeSubscription;

#[async_trait]
impl Call for VerifyProduct {
    type Output = Receipt;
    const NAME: &'static str = "verification";

    async fn invoke<C>(client: &C, target: &PurchaseTarget) -> Result<Receipt, ClientError>
    where
        C: PublisherClient + ?Sized,
    {
        client
            .verify(&target.package, &target.product_id, &target.token)
            .await
            .map(Receipt::new)
    }
}

#[async_trait]
impl Call for VerifySubscription {
    type Output = Subscription;
    const NAME: &'static str = "subscription verification";

    async fn invoke<C>(client: &C, target: &PurchaseTarget) -> Result<Subscription, ClientError>
    where
        C: PublisherClient + ?Sized,
    {
        client
            .verify_subscription(&target.package, &target.product_id, &target.token)
            .await
            .map(Subscription::new)
    }
}

#[async_trait]
impl Call for AcknowledgeProduct {
    type Output = Receipt;
    const NAME: &'static str = "acknowledgement";

    async fn invoke<C>(client: &C, target: &PurchaseTarget) -> Result<Receipt, ClientError>
    where
        C: PublisherClient + ?Sized,
    {
        client
            .acknowledge(&target.package, &target.product_id, &target.token)
            .await
            .map(Receipt::new)
    }
}

#[async_trait]
impl Call for AcknowledgeSubscription {
    // The endpoint has no payload on success
    type Output = bool;
    const NAME: &'static str = "subscription acknowledgement";

    async fn invoke<C>(client: &C, target: &PurchaseTarget) -> Result<bool, ClientError>
    where
        C: PublisherClient + ?Sized,
    {
        client
            .acknowledge_subscription_purchase(&target.package, &target.product_id, &target.token)
            .await
            .map(|()| true)
    }
}

pub struct Operation<'a, C: ?Sized, K> {
    client: &'a C,
    target: PurchaseTarget,
    _call: PhantomData<K>,
}

pub type Verification<'a, C> = Operation<'a, C, VerifyProduct>;
pub type SubscriptionVerification<'a, C> = Operation<'a, C, VerifySubscription>;
pub type Acknowledgement<'a, C> = Operation<'a, C, AcknowledgeProduct>;
pub type SubscriptionAcknowledgement<'a, C> = Operation<'a, C, AcknowledgeSubscription>;

impl<'a, C, K> Operation<'a, C, K>
where
    C: PublisherClient + ?Sized,
    K: Call,
{
    pub fn new(
        client: &'a C,
        package: impl Into<String>,
        product_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::for_target(client, PurchaseTarget::new(package, product_id, token))
    }

    pub fn for_target(client: &'a C, target: PurchaseTarget) -> Self {
        Self {
            client,
            target,
            _call: PhantomData,
        }
    }

    pub fn package(&self) -> &str {
        &self.target.package
    }

    pub fn product_id(&self) -> &str {
        &self.target.product_id
    }

    pub fn token(&self) -> &str {
        &self.target.token
    }

    /// Performs the remote call. Client errors come back as `Outcome::Failure`.
    pub async fn execute(self) -> Outcome<K::Output> {
        debug!(
            call = K::NAME,
            package = %self.target.package,
            product_id = %self.target.product_id,
            token = %token_fingerprint(&self.target.token),
            "Calling Play Developer API"
        );

        match K::invoke(self.client, &self.target).await {
            Ok(output) => Outcome::Success(output),
            Err(e) => {
                warn!(
                    call = K::NAME,
                    package = %self.target.package,
                    product_id = %self.target.product_id,
                    status = ?e.status_code(),
                    error = %e,
                    "Play Developer API call failed"
                );
                Outcome::Failure(e.into())
            }
        }
    }
}
