use std::path::{Path, PathBuf};

use tracing::instrument;

use crate::{
    config::GooglePlayConfig,
    error::{BootRequiredError, Result},
    models::{Outcome, Receipt},
    services::{
        google_play_client::{ClientSettings, GooglePlayConnector},
        lifecycle::Lifecycle,
        operation::{Acknowledgement, SubscriptionAcknowledgement},
        publisher_client::Connector,
    },
};

/// Acknowledges product and subscription purchases.
///
/// Google refunds purchases that are not acknowledged within three days.
/// Acknowledging an already acknowledged purchase is accepted by the API.
pub struct Acknowledger<K: Connector = GooglePlayConnector> {
    lifecycle: Lifecycle<K>,
}

impl Acknowledger<GooglePlayConnector> {
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

impl<K: Connector> Acknowledger<K> {
    pub fn with_connector(config_key_path: impl Into<PathBuf>, connector: K) -> Self {
        Self {
            lifecycle: Lifecycle::new("acknowledger", config_key_path.into(), connector),
        }
    }

    pub fn config_key_path(&self) -> &Path {
        self.lifecycle.config_key_path()
    }

    /// `boot()` has been called, successfully or not
    pub fn booted(&self) -> bool {
        self.lifecycle.booted()
    }

    pub async fn boot(&mut self) -> Result<()> {
        self.lifecycle.boot().await
    }

    /// The receipt is read back after acknowledging. If that read fails the
    /// acknowledgement still succeeded, and the receipt only carries the
    /// product id and the acknowledged state.
    #[instrument(skip(self, token))]
    pub async fn acknowledge(
        &self,
        package: &str,
        product_id: &str,
        token: &str,
    ) -> std::result::Result<Outcome<Receipt>, BootRequiredError> {
        let client = self.lifecycle.client()?;
        Ok(Acknowledgement::new(client, package, product_id, token)
            .execute()
            .await)
    }

    /// Returns `Outcome::Success(true)` once Google accepted the acknowledgement
    #[instrument(skip(self, token))]
    pub async fn acknowledge_subscription(
        &self,
        package: &str,
        subscription_id: &str,
        token: &str,
    ) -> std::result::Result<Outcome<bool>, BootRequiredError> {
        let client = self.lifecycle.client()?;
        Ok(
            SubscriptionAcknowledgement::new(client, package, subscription_id, token)
                .execute()
                .await,
        )
    }
}
