use adm_store::StoreClient;

use crate::{
    config::ConsoleConfig, error::ConsoleError, notification::Notifier,
    product::ProductManager, user::UserManager,
};

/// Shared handles for one console session
#[derive(Clone, Debug)]
pub struct ConsoleState {
    pub client: StoreClient,
    pub config: ConsoleConfig,
    pub notifier: Notifier,
}

impl ConsoleState {
    pub fn new(config: ConsoleConfig, notifier: Notifier) -> Result<Self, ConsoleError> {
        let client = StoreClient::new(
            &config.api_base,
            config.request_timeout(),
            &config.timezone,
        )?;

        Ok(Self {
            client,
            config,
            notifier,
        })
    }

    pub fn user_manager(&self) -> UserManager {
        UserManager::new(self.client.clone(), self.notifier.clone())
    }

    pub fn product_manager(&self) -> ProductManager {
        ProductManager::new(self.client.clone(), self.notifier.clone())
    }
}
