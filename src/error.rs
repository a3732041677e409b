use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Invalid contract '{contract}': {details}")]
    ValidationError { contract: String, details: String },

    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    #[error("Document extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Anomaly explanation failed: {0}")]
    ExplanationFailed(String),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
