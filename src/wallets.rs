use std::sync::Arc;

use crate::api::types::{BankMovementRequest, CreateWalletRequest, TransferRequest, Wallet};
use crate::api_client::ApiClient;
use crate::errors::{BankError, BankResult};
use crate::session::SessionManager;
use crate::validation::InputValidator;

/// An in-flight deposit or withdrawal, as submitted from a form.
#[derive(Debug, Clone)]
pub struct PendingOperation {
    pub currency: String,
    /// Raw user input; normalized and checked before dispatch.
    pub amount: String,
    pub bank_reference: String,
}

/// An in-flight transfer between wallets.
#[derive(Debug, Clone)]
pub struct TransferOrder {
    pub source_currency: String,
    pub destination_currency: String,
    pub destination_address: String,
    pub amount: String,
}

/// Deposit, withdraw, transfer and wallet-creation flows.
///
/// Every mutation is followed by a full re-fetch of the wallet collection;
/// the balance shown to the user is always the server's, never a value the
/// client computed.
pub struct WalletManager {
    client: Arc<ApiClient>,
    session: Arc<SessionManager>,
    validator: InputValidator,
}

impl WalletManager {
    pub fn new(client: Arc<ApiClient>, session: Arc<SessionManager>) -> BankResult<Self> {
        Ok(Self {
            client,
            session,
            validator: InputValidator::new()?,
        })
    }

    pub async fn list(&self) -> BankResult<Vec<Wallet>> {
        let response = self.guard(self.client.get("/wallets/").await)?;
        response.json()
    }

    /// Create a wallet for the given currency. Duplicate or unsupported
    /// currency rejections come back from the server and surface verbatim.
    pub async fn create(&self, currency: &str) -> BankResult<Vec<Wallet>> {
        self.validator.require("Currency", currency)?;

        let request = CreateWalletRequest {
            currency: currency.trim().to_string(),
        };
        self.guard(self.client.post("/wallets/", &request).await)?;
        log::info!("Created wallet for {}", request.currency);
        self.list().await
    }

    pub async fn deposit(&self, operation: &PendingOperation) -> BankResult<Vec<Wallet>> {
        self.bank_movement(operation, "deposit").await
    }

    pub async fn withdraw(&self, operation: &PendingOperation) -> BankResult<Vec<Wallet>> {
        self.bank_movement(operation, "withdraw").await
    }

    async fn bank_movement(
        &self,
        operation: &PendingOperation,
        action: &str,
    ) -> BankResult<Vec<Wallet>> {
        self.validator.require("Currency", &operation.currency)?;
        self.validator
            .require("Bank account", &operation.bank_reference)?;
        let amount = self.validator.validate_amount(&operation.amount)?;

        let request = BankMovementRequest {
            amount,
            bank_account: operation.bank_reference.trim().to_string(),
        };
        let path = format!("/wallets/{}/{}/", operation.currency.trim(), action);
        self.guard(self.client.put(&path, &request).await)?;
        log::info!("{} confirmed for {}", action, operation.currency.trim());
        self.list().await
    }

    pub async fn transfer(&self, order: &TransferOrder) -> BankResult<Vec<Wallet>> {
        self.validator
            .require("Source currency", &order.source_currency)?;
        self.validator
            .require("Destination currency", &order.destination_currency)?;
        self.validator
            .require("Destination address", &order.destination_address)?;
        let amount = self.validator.validate_amount(&order.amount)?;

        let request = TransferRequest {
            source_currency: order.source_currency.trim().to_string(),
            destination_currency: order.destination_currency.trim().to_string(),
            destination_address: order.destination_address.trim().to_string(),
            amount,
        };
        self.guard(self.client.post("/wallets/transfer/", &request).await)?;
        log::info!(
            "Transfer confirmed: {} -> {}",
            request.source_currency,
            request.destination_currency
        );
        self.list().await
    }

    /// A 401 on any wallet call means the stored token is dead; signal the
    /// session before propagating.
    fn guard<T>(&self, result: BankResult<T>) -> BankResult<T> {
        if let Err(BankError::Unauthorized) = &result {
            self.session.note_unauthorized()?;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::credential_store::CredentialStore;
    use crate::storage::MemoryKeyValueStore;

    // Points at a closed port: reaching the network at all would fail the
    // test with a non-validation error.
    fn manager() -> WalletManager {
        let config = ClientConfig::default().with_api_base_url("http://127.0.0.1:9");
        let credentials = CredentialStore::new(Arc::new(MemoryKeyValueStore::new()));
        let client = Arc::new(ApiClient::new(&config, credentials.clone()).unwrap());
        let session = Arc::new(SessionManager::new(client.clone(), credentials).unwrap());
        WalletManager::new(client, session).unwrap()
    }

    #[tokio::test]
    async fn empty_currency_blocks_create_locally() {
        let err = manager().create("  ").await.unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
    }

    #[tokio::test]
    async fn bad_amount_blocks_deposit_before_network() {
        let op = PendingOperation {
            currency: "USD".to_string(),
            amount: "abc".to_string(),
            bank_reference: "PL61109010140000071219812874".to_string(),
        };
        let err = manager().deposit(&op).await.unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
    }

    #[tokio::test]
    async fn zero_amount_blocks_withdraw_before_network() {
        let op = PendingOperation {
            currency: "USD".to_string(),
            amount: "0,00".to_string(),
            bank_reference: "PL61109010140000071219812874".to_string(),
        };
        let err = manager().withdraw(&op).await.unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
    }

    #[tokio::test]
    async fn transfer_requires_destination_address() {
        let order = TransferOrder {
            source_currency: "USD".to_string(),
            destination_currency: "EUR".to_string(),
            destination_address: "".to_string(),
            amount: "10,00".to_string(),
        };
        let err = manager().transfer(&order).await.unwrap_err();
        assert!(matches!(err, BankError::Validation(_)));
    }
}
