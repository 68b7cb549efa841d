use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    error::{BootRequiredError, Result},
    services::publisher_client::Connector,
};

enum BootState<C> {
    Unbooted,
    /// `boot()` ran and failed; the facade can't be booted again
    Failed,
    Booted(C),
}

/// Boot-once holder for a facade's client
pub(crate) struct Lifecycle<K: Connector> {
    service: &'static str,
    config_key_path: PathBuf,
    connector: K,
    state: BootState<K::Client>,
}

impl<K: Connector> Lifecycle<K> {
    pub fn new(service: &'static str, config_key_path: PathBuf, connector: K) -> Self {
        Self {
            service,
            config_key_path,
            connector,
            state: BootState::Unbooted,
        }
    }

    pub fn config_key_path(&self) -> &Path {
        &self.config_key_path
    }

    /// Whether `boot()` has been called, whatever its result
    pub fn booted(&self) -> bool {
        !matches!(self.state, BootState::Unbooted)
    }

    pub async fn boot(&mut self) -> Result<()> {
        if self.booted() {
            return Err(BootRequiredError::already_booted(self.service).into());
        }

        // A failed attempt still counts as the one boot
        self.state = BootState::Failed;
        match self.connector.connect(&self.config_key_path).await {
            Ok(client) => {
                self.state = BootState::Booted(client);
                info!(
                    service = self.service,
                    key_path = %self.config_key_path.display(),
                    "Booted Play Store {}", self.service
                );
                Ok(())
            }
            Err(e) => {
                warn!(service = self.service, error = %e, "Boot failed");
                Err(e)
            }
        }
    }

    pub fn client(&self) -> std::result::Result<&K::Client, BootRequiredError> {
        match &self.state {
            BootState::Booted(client) => Ok(client),
            BootState::Unbooted | BootState::Failed => {
                Err(BootRequiredError::not_booted(self.service))
            }
        }
    }
}
