use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::{
    config::GooglePlayConfig,
    error::{BootRequiredError, Result},
    models::{Outcome, Receipt, Subscription},
    services::{
        google_play_client::{ClientSettings, GooglePlayConnector},
        lifecycle::Lifecycle,
        operation::{SubscriptionVerification, Verification},
        publisher_client::Connector,
    },
};

/// Verifies product and subscription purchases against the Play Developer API.
///
/// Call [`Verifier::boot`] exactly once, then any number of `verify*` calls.
///
/// ```no_run
/// # async fn run() -> playcheck::Result<()> {
/// let mut verifier = playcheck::Verifier::new("path/to/google_play.json");
/// verifier.boot().await?;
///
/// let outcome = verifier
///     .verify("my.bundle", "product_1", "a-very-long-secure-token")
///     .await?;
/// if outcome.success().is_some_and(|receipt| receipt.valid()) {
///     // grant the purchase
/// }
/// # Ok(())
/// # }
/// ```
pub struct Verifier<K: Connector = GooglePlayConnector> {
    lifecycle: Lifecycle<K>,
}

impl Verifier<GooglePlayConnector> {
    pub fn new(config_key_path: impl Into<PathBuf>) -> Self {
        Self::with_connector(config_key_path, GooglePlayConnector::default())
    }

    pub fn from_config(config_key_path: impl Into<PathBuf>, config: &GooglePlayConfig) -> Self {
        Self::with_connector(
            config_key_path,
            GooglePlayConnector::new(ClientSettings::from(config)),
        )
    }
}

impl<K: Connector> Verifier<K> {
    pub fn with_connector(config_key_path: impl Into<PathBuf>, connector: K) -> Self {
        Self {
            lifecycle: Lifecycle::new("verifier", config_key_path.into(), connector),
        }
    }

    pub fn config_key_path(&self) -> &Path {
        self.lifecycle.config_key_path()
    }

    /// `boot()` has been called, successfully or not
    pub fn booted(&self) -> bool {
        self.lifecycle.booted()
    }

    /// Authorizes against Google. Fails if called a second time, even when
    /// the first attempt failed.
    pub async fn boot(&mut self) -> Result<()> {
        self.lifecycle.boot().await
    }

    #[instrument(skip(self, token))]
    pub async fn verify(
        &self,
        package: &str,
        product_id: &str,
        token: &str,
    ) -> std::result::Result<Outcome<Receipt>, BootRequiredError> {
        let client = self.lifecycle.client()?;
        Ok(Verification::new(client, package, product_id, token)
            .execute()
            .await)
    }

    #[instrument(skip(self, token))]
    pub async fn verify_subscription(
        &self,
        package: &str,
        subscription_id: &str,
        token: &str,
    ) -> std::result::Result<Outcome<Subscription>, BootRequiredError> {
        let client = self.lifecycle.client()?;
        Ok(
            SubscriptionVerification::new(client, package, subscription_id, token)
                .execute()
                .await,
        )
    }
}
