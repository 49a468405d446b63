use std::collections::HashSet;

use chrono::NaiveDate;
use reqwest::Client;

use crate::api::types::{Rate, RateTable};
use crate::config::ClientConfig;
use crate::errors::{BankError, BankResult};

/// The upstream publishes three rate tables; they are fetched and merged in
/// this order, and the first table to mention a currency code wins.
const TABLES: [&str; 3] = ["A", "B", "C"];

/// Client for the third-party exchange-rate service.
///
/// Deliberately separate from `ApiClient`: rate calls go to a different host
/// and must never carry the banking auth token.
pub struct RatesClient {
    client: Client,
    base_url: String,
}

impl RatesClient {
    pub fn new(config: &ClientConfig) -> BankResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| BankError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(RatesClient {
            client,
            base_url: config.rates_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Latest published rates, merged across all three tables.
    pub async fn current(&self) -> BankResult<Vec<Rate>> {
        let mut per_table = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            per_table.push(self.fetch_table(table, None).await?);
        }
        Ok(merge_tables(per_table))
    }

    /// Rates as published on the given date. A table with no publication for
    /// that date (404) contributes nothing; any other failure is fatal.
    pub async fn archived(&self, date: NaiveDate) -> BankResult<Vec<Rate>> {
        let mut per_table = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            per_table.push(self.fetch_table(table, Some(date)).await?);
        }
        Ok(merge_tables(per_table))
    }

    async fn fetch_table(&self, table: &str, date: Option<NaiveDate>) -> BankResult<Vec<Rate>> {
        let url = match date {
            Some(date) => format!(
                "{}/exchangerates/tables/{}/{}?format=json",
                self.base_url,
                table,
                date.format("%Y-%m-%d")
            ),
            None => format!("{}/exchangerates/tables/{}?format=json", self.base_url, table),
        };

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.as_u16() == 404 && date.is_some() {
            log::debug!("No table {} publication for {:?}", table, date);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(BankError::Server {
                status: status.as_u16(),
                message: format!("Rate table {} unavailable", table),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BankError::Network(format!("Failed to read response: {}", e)))?;
        let tables: Vec<RateTable> = serde_json::from_str(&body)
            .map_err(|e| BankError::InvalidResponse(format!("Rate table {}: {}", table, e)))?;

        Ok(tables.into_iter().next().map(|t| t.rates).unwrap_or_default())
    }
}

/// Merge per-table results keeping the first occurrence of each currency
/// code, in table order.
fn merge_tables(per_table: Vec<Vec<Rate>>) -> Vec<Rate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    for rates in per_table {
        for rate in rates {
            if seen.insert(rate.code.clone()) {
                merged.push(rate);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(code: &str, mid: f64) -> Rate {
        Rate {
            currency: code.to_lowercase(),
            code: code.to_string(),
            mid,
        }
    }

    #[test]
    fn merge_keeps_first_table_occurrence() {
        let merged = merge_tables(vec![
            vec![rate("EUR", 4.30), rate("USD", 3.95)],
            vec![rate("EUR", 9.99), rate("CZK", 0.17)],
            vec![rate("USD", 9.99), rate("XDR", 5.31)],
        ]);

        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0], rate("EUR", 4.30));
        assert_eq!(merged[1], rate("USD", 3.95));
        assert_eq!(merged[2], rate("CZK", 0.17));
        assert_eq!(merged[3], rate("XDR", 5.31));
    }

    #[test]
    fn merge_yields_at_most_one_entry_per_code() {
        let merged = merge_tables(vec![
            vec![rate("GBP", 5.0), rate("GBP", 5.1)],
            vec![rate("GBP", 5.2)],
        ]);
        assert_eq!(merged, vec![rate("GBP", 5.0)]);
    }

    #[test]
    fn merge_of_empty_tables_is_empty() {
        assert!(merge_tables(vec![Vec::new(), Vec::new(), Vec::new()]).is_empty());
    }
}
