/// HTTP gateway for the banking REST backend.
///
/// Every outbound call in the client goes through this module: it owns the
/// single reqwest client, applies the fixed per-call timeout, injects the
/// stored auth token, and normalizes the backend's heterogeneous error
/// bodies into `BankError` so call sites never re-parse them.
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::credential_store::CredentialStore;
use crate::errors::{BankError, BankResult};

/// A received 2xx response. Non-2xx never reaches callers as a response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> BankResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| BankError::InvalidResponse(format!("Failed to parse body: {}", e)))
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, credentials: CredentialStore) -> BankResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| BankError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(ApiClient {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub async fn get(&self, path: &str) -> BankResult<ApiResponse> {
        self.dispatch(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> BankResult<ApiResponse> {
        self.dispatch(Method::POST, path, Some(to_body(body)?)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> BankResult<ApiResponse> {
        self.dispatch(Method::PUT, path, Some(to_body(body)?)).await
    }

    /// Single attempt per call; retry policy belongs to the caller (and no
    /// caller in this client retries).
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> BankResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);

        // Attach the stored credential when present; otherwise the request
        // goes out unauthenticated (login and registration rely on this).
        if let Some(token) = self.credentials.token()? {
            request = request.header("Authorization", format!("Token {}", token));
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BankError::Network(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            return Ok(ApiResponse {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("{} {} failed with status {}", method, url, status);
        Err(error_from_response(status.as_u16(), &body))
    }
}

fn to_body<B: Serialize>(body: &B) -> BankResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| BankError::Validation(format!("Unserializable request body: {}", e)))
}

/// Normalize a non-2xx response into a tagged error.
///
/// The backend answers errors in several shapes: a bare JSON array of
/// messages, `{"non_field_errors": [...]}`, field-keyed lists such as
/// `{"amount": [...]}`, or `{"error"|"detail": "..."}`. The first message
/// found decides the business classification.
pub(crate) fn error_from_response(status: u16, body: &str) -> BankError {
    if status == 401 {
        return BankError::Unauthorized;
    }

    match first_error_message(body) {
        Some(message) => classify_message(status, message),
        None => BankError::Server {
            status,
            message: "Something went wrong. Please try again later.".to_string(),
        },
    }
}

fn classify_message(status: u16, message: String) -> BankError {
    let lowered = message.to_lowercase();
    if lowered.contains("insufficient") {
        BankError::InsufficientBalance
    } else if lowered.contains("0.01") || lowered.contains("minimum") {
        BankError::BelowMinimum
    } else {
        BankError::Server { status, message }
    }
}

fn first_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value {
        Value::Array(items) => first_string(&items),
        Value::Object(map) => {
            // Known keys first, in a fixed order, then anything else.
            for key in ["non_field_errors", "amount", "currency", "error", "detail"] {
                if let Some(found) = map.get(key).and_then(message_from_value) {
                    return Some(found);
                }
            }
            map.values().find_map(message_from_value)
        }
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => first_string(items),
        _ => None,
    }
}

fn first_string(items: &[Value]) -> Option<String> {
    items.iter().find_map(|item| match item {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}
