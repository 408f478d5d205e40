//! Shared command context: one configured gateway client, session store, and
//! request log per invocation.

use std::sync::Arc;

use medicart_client::{
    CartStore, ConfigError, FileSessionStore, GatewayClient, GatewayConfig, RequestLog,
    SessionStore,
};

/// Everything a command needs to talk to the gateway.
pub struct Context {
    config: GatewayConfig,
    client: GatewayClient,
}

impl Context {
    /// Build the context from the environment: load the configuration, the
    /// persisted session, and the persisted request log, then wire the
    /// client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the environment configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = GatewayConfig::from_env()?;
        let log = RequestLog::load_from(&config.log_file);
        let session: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(config.session_file.clone()));
        let client = GatewayClient::new(&config, session, log);
        Ok(Self { config, client })
    }

    /// The configured gateway client.
    pub const fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// A cart store over this context's client.
    pub fn cart_store(&self) -> CartStore {
        CartStore::new(self.client.clone())
    }

    /// Persist the request log back to its file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the log file cannot be written.
    pub fn save_log(&self) -> std::io::Result<()> {
        self.client.request_log().save_to(&self.config.log_file)
    }
}
