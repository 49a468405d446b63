use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::types::{Rate, Transaction, Wallet};
use crate::api_client::ApiClient;
use crate::errors::{BankError, BankResult};
use crate::rates::RatesClient;
use crate::session::SessionManager;

/// Rendering snapshot of a single fetch.
///
/// Snapshots are immutable; a screen swaps in whatever the latest completed
/// fetch produced. Two fetches for the same resource may overlap and the
/// last one to settle wins; there is no in-flight deduplication.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn loading(&self) -> FetchState<T> {
        FetchState::Loading
    }

    pub fn resolve(result: BankResult<T>) -> FetchState<T> {
        match result {
            Ok(data) => FetchState::Ready(data),
            Err(err) => FetchState::Failed(err.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Fetch-and-render data sources: wallet listing, transaction history and
/// currency rates. No invariants beyond "show the latest successful fetch,
/// else the error".
pub struct DataViews {
    client: Arc<ApiClient>,
    rates: Arc<RatesClient>,
    session: Arc<SessionManager>,
}

impl DataViews {
    pub fn new(
        client: Arc<ApiClient>,
        rates: Arc<RatesClient>,
        session: Arc<SessionManager>,
    ) -> Self {
        Self {
            client,
            rates,
            session,
        }
    }

    pub async fn wallets(&self) -> FetchState<Vec<Wallet>> {
        self.settle(self.fetch_json("/wallets/").await)
    }

    pub async fn transactions(&self) -> FetchState<Vec<Transaction>> {
        self.settle(self.fetch_json("/transactions/").await)
    }

    pub async fn current_rates(&self) -> FetchState<Vec<Rate>> {
        FetchState::resolve(self.rates.current().await)
    }

    pub async fn archived_rates(&self, date: NaiveDate) -> FetchState<Vec<Rate>> {
        FetchState::resolve(self.rates.archived(date).await)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> BankResult<T> {
        self.client.get(path).await?.json()
    }

    /// A 401 on an authenticated view is the session-ending signal.
    fn settle<T>(&self, result: BankResult<T>) -> FetchState<T> {
        if let Err(BankError::Unauthorized) = &result {
            if let Err(err) = self.session.note_unauthorized() {
                log::warn!("Failed to clear rejected credential: {}", err);
            }
        }
        FetchState::resolve(result)
    }
}
