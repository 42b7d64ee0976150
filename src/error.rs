//! Error types for the transparency dashboard

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {

    // =============================
    // Authentication & Sessions
    // =============================

    #[error("Unknown identity: {0}")]
    UnknownIdentity(String),

    #[error("Credential rejected: {0}")]
    CredentialRejected(String),

    #[error("Unknown session token")]
    UnknownSession,

    #[error("Profile store error: {0}")]
    ProfileStoreError(String),

    // =============================
    // Record Intake
    // =============================

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Unknown record: {0}")]
    UnknownRecord(String),

    // =============================
    // Narrative Generation
    // =============================

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Generation service not configured")]
    GenerationNotConfigured,

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
