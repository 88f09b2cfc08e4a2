//! Pipeline SPI - contracts for the external collaborators
//!
//! The model configuration store and the credit ledger are owned by other
//! systems; the pipeline only consumes them through these traits. Test
//! doubles live in [`crate::testing`].

use async_trait::async_trait;
use thiserror::Error;

use crate::api::ModelDescriptor;

/// Opaque identifier of one ledger reservation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReservationId(String);

impl ReservationId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an id issued by an external ledger.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a reservation inside the ledger.
///
/// Every reservation must reach exactly one terminal state before its
/// request finishes; `Pending` after the pipeline returns means the commit
/// could not be acknowledged and the ledger needs reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    Pending,
    Committed,
    RolledBack,
}

/// Ledger operation failures.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("insufficient credits: required {required}, available {balance}")]
    InsufficientCredits { required: u64, balance: u64 },

    #[error("unknown reservation: {0}")]
    UnknownReservation(String),

    #[error("reservation {0} is not in a state that allows this operation")]
    InvalidState(String),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Unavailable(_))
    }
}

/// Read access to the externally administered model configuration.
///
/// Implementations may cache; staleness of one admin polling interval is
/// acceptable, read-your-own-writes is not required.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Look up one model's descriptor.
    async fn lookup_model(&self, model_id: &str) -> Option<ModelDescriptor>;

    /// The default model id configured for an account tier.
    async fn default_model_for_tier(&self, tier: &str) -> Option<String>;
}

/// The prepaid credit ledger.
///
/// # Atomicity
///
/// `reserve` must be atomic with respect to concurrent calls for the same
/// account: the sum of outstanding holds and debits can never exceed the
/// balance any single call observed. Two concurrent reservations against a
/// balance that covers only one must yield exactly one success.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Current available balance (excludes pending holds).
    async fn balance(&self, account_id: &str) -> Result<u64, LedgerError>;

    /// Atomically check the balance and place a hold.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientCredits`] when the available balance does
    /// not cover `amount`.
    async fn reserve(&self, account_id: &str, amount: u64) -> Result<ReservationId, LedgerError>;

    /// Convert a pending hold into a permanent debit; returns the new
    /// available balance. Durable once acknowledged.
    async fn commit(&self, reservation: &ReservationId) -> Result<u64, LedgerError>;

    /// Release a pending hold back to the balance.
    ///
    /// Idempotent: rolling back an already rolled-back reservation succeeds
    /// without crediting twice.
    async fn rollback(&self, reservation: &ReservationId) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reservation_ids_are_unique() {
        assert_ne!(ReservationId::generate(), ReservationId::generate());
    }

    #[test]
    fn ledger_error_transience() {
        assert!(LedgerError::Unavailable("io".into()).is_transient());
        assert!(!LedgerError::InsufficientCredits { required: 2, balance: 1 }.is_transient());
        assert!(!LedgerError::UnknownReservation("x".into()).is_transient());
    }
}
