use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BankError {
    // Local validation errors; no network call was made
    Validation(String),

    // Transport errors; no response was received
    Network(String),

    // Authentication errors
    Credentials,
    Unauthorized,

    // Business errors recognized from server error bodies
    InsufficientBalance,
    BelowMinimum,

    // Server rejected the request with some other non-2xx status
    Server { status: u16, message: String },

    // 2xx response whose body is missing expected fields
    InvalidResponse(String),

    // Persistent key/value store errors
    Storage(String),
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BankError::Validation(msg) => write!(f, "Validation error: {}", msg),
            BankError::Network(msg) => write!(f, "Network error: {}", msg),

            BankError::Credentials => {
                write!(f, "Login failed. Please check your credentials.")
            }
            BankError::Unauthorized => write!(f, "Session is no longer valid"),

            BankError::InsufficientBalance => write!(f, "Insufficient balance"),
            BankError::BelowMinimum => write!(f, "Amount must be at least 0.01"),

            BankError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            BankError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),

            BankError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for BankError {}

pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    /// True when the failure was caught before any request was dispatched.
    pub fn is_local(&self) -> bool {
        matches!(self, BankError::Validation(_) | BankError::Storage(_))
    }

    /// True when the user can simply retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BankError::Network(_))
    }
}

// Conversion helpers
impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(error: serde_json::Error) -> Self {
        BankError::InvalidResponse(format!("JSON error: {}", error))
    }
}

impl From<reqwest::Error> for BankError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            BankError::Network("Request timed out".to_string())
        } else if error.is_connect() {
            BankError::Network(format!("Connection failed: {}", error))
        } else {
            BankError::Network(error.to_string())
        }
    }
}
