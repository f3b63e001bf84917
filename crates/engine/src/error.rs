//! The module contains the errors the engine can throw.
//!
//! The variants split along the caller contract:
//!
//! - [`Forbidden`], [`KeyNotFound`], [`AlreadyProcessed`] gate access to a
//!   pending action before any ledger work happens.
//! - [`Overpayment`], [`AlreadySettled`], [`InvalidDraft`], [`InvalidAmount`]
//!   are validation failures the caller can fix and resubmit.
//! - [`Database`] is a store failure; the transaction is rolled back in full.
//!
//! [`Forbidden`]: EngineError::Forbidden
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`AlreadyProcessed`]: EngineError::AlreadyProcessed
//! [`Overpayment`]: EngineError::Overpayment
//! [`AlreadySettled`]: EngineError::AlreadySettled
//! [`InvalidDraft`]: EngineError::InvalidDraft
//! [`InvalidAmount`]: EngineError::InvalidAmount
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("This action was already processed: {0}")]
    AlreadyProcessed(String),
    #[error("Already settled: {0}")]
    AlreadySettled(String),
    #[error("Overpayment: {0}")]
    Overpayment(String),
    #[error("Invalid draft: {0}")]
    InvalidDraft(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::AlreadyProcessed(a), Self::AlreadyProcessed(b)) => a == b,
            (Self::AlreadySettled(a), Self::AlreadySettled(b)) => a == b,
            (Self::Overpayment(a), Self::Overpayment(b)) => a == b,
            (Self::InvalidDraft(a), Self::InvalidDraft(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
