// lib.rs - Core library structure for the banking client

pub mod api;
pub mod api_client;
pub mod app_state;
pub mod config;
pub mod credential_store;
pub mod errors;
pub mod rates;
pub mod session;
pub mod storage;
pub mod validation;
pub mod views;
pub mod wallets;

// Re-export common types
pub use api::types::{
    AuthResponse, Rate, RateTable, Transaction, TransactionType, UserProfile, Wallet,
};
pub use api_client::{ApiClient, ApiResponse};
pub use app_state::BankContext;
pub use config::ClientConfig;
pub use credential_store::CredentialStore;
pub use errors::{BankError, BankResult};
pub use rates::RatesClient;
pub use session::{ProfileUpdate, RegistrationForm, SessionManager, SessionState};
pub use storage::{ClientPaths, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use validation::InputValidator;
pub use views::{DataViews, FetchState};
pub use wallets::{PendingOperation, TransferOrder, WalletManager};
