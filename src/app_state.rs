use std::path::PathBuf;
use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::config::ClientConfig;
use crate::credential_store::CredentialStore;
use crate::errors::BankResult;
use crate::rates::RatesClient;
use crate::session::SessionManager;
use crate::storage::{ClientPaths, FileKeyValueStore};
use crate::views::DataViews;
use crate::wallets::WalletManager;

/// Everything a front end needs, wired together once at startup.
pub struct BankContext {
    paths: ClientPaths,
    config: ClientConfig,
    credentials: CredentialStore,
    client: Arc<ApiClient>,
    session: Arc<SessionManager>,
    wallets: WalletManager,
    views: DataViews,
}

impl BankContext {
    /// Initialize with configuration from the environment, persisting state
    /// under the given root directory.
    pub fn initialize(root_dir: PathBuf) -> BankResult<Self> {
        Self::with_config(root_dir, ClientConfig::from_env())
    }

    pub fn with_config(root_dir: PathBuf, config: ClientConfig) -> BankResult<Self> {
        let paths = ClientPaths::new(&root_dir)?;
        paths.ensure_directories()?;

        let store = Arc::new(FileKeyValueStore::from_paths(&paths));
        let credentials = CredentialStore::new(store);

        let client = Arc::new(ApiClient::new(&config, credentials.clone())?);
        let rates = Arc::new(RatesClient::new(&config)?);

        let session = Arc::new(SessionManager::new(client.clone(), credentials.clone())?);
        session.restore()?;

        let wallets = WalletManager::new(client.clone(), session.clone())?;
        let views = DataViews::new(client.clone(), rates, session.clone());

        log::info!(
            "Bank client initialized against {} (data in {})",
            config.api_base_url,
            paths.root_dir().display()
        );

        Ok(Self {
            paths,
            config,
            credentials,
            client,
            session,
            wallets,
            views,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn wallets(&self) -> &WalletManager {
        &self.wallets
    }

    pub fn views(&self) -> &DataViews {
        &self.views
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn paths(&self) -> &ClientPaths {
        &self.paths
    }
}
