use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Body returned by both the login and registration endpoints.
///
/// `token` stays optional: the backend has been observed answering 2xx
/// without one, which the session layer treats as a credential failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_updated: Option<DateTime<Utc>>,
}

/// Cached identity snapshot. A display cache only; the server record is
/// authoritative and this copy is overwritten on every confirmed change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_updated: Option<DateTime<Utc>>,
}

impl From<AuthResponse> for UserProfile {
    fn from(body: AuthResponse) -> Self {
        Self {
            user_id: body.user_id,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            date_joined: body.date_joined,
            date_updated: body.date_updated,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdateRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub currency: String,
    /// Balance exactly as the server serialized it. Never recomputed locally.
    pub balance: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWalletRequest {
    pub currency: String,
}

/// Body for the per-currency deposit and withdraw endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BankMovementRequest {
    pub amount: String,
    pub bank_account: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub source_currency: String,
    pub destination_currency: String,
    pub destination_address: String,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "DEPOSIT")]
    Deposit,
    // The backend spells it this way; the client must match it.
    #[serde(rename = "WITHDRAWL")]
    Withdrawal,
    #[serde(rename = "TRANSFER")]
    Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: String,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

/// One published exchange rate from the third-party rate service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub currency: String,
    pub code: String,
    pub mid: f64,
}

/// One element of the array returned per rate table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub effective_date: Option<String>,
    pub rates: Vec<Rate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_without_token_decodes() {
        let body: AuthResponse = serde_json::from_str(
            r#"{"user_id": 7, "email": "a@b.pl", "first_name": "Ada", "last_name": "Nowak"}"#,
        )
        .unwrap();
        assert!(body.token.is_none());
        assert_eq!(body.user_id, 7);
    }

    #[test]
    fn transaction_type_matches_backend_spelling() {
        let tx: Transaction = serde_json::from_str(
            r#"{"type": "WITHDRAWL", "amount": "10.00", "currency": "PLN",
                "timestamp": "2024-06-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Withdrawal);
    }

    #[test]
    fn rate_table_decodes_nbp_shape() {
        let tables: Vec<RateTable> = serde_json::from_str(
            r#"[{"table": "A", "no": "001/A/NBP/2024", "effectiveDate": "2024-06-03",
                 "rates": [{"currency": "euro", "code": "EUR", "mid": 4.3012}]}]"#,
        )
        .unwrap();
        assert_eq!(tables[0].rates[0].code, "EUR");
    }
}
