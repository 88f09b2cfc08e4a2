//! Credit guard - atomic pre-authorization with guaranteed cleanup
//!
//! Billing is reserve-first: the cost is held before the provider call and
//! converted to a debit only after usable output exists. Debit-first with
//! refund-on-failure would leave a window where a crash charges the user
//! for nothing; the hold removes that window at the price of a two-phase
//! ledger interaction.

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::api::{PipelineError, PipelineResult};
use crate::spi::{CreditLedger, LedgerError, ReservationId};

/// Places holds against the credit ledger.
pub struct CreditGuard {
    ledger: Arc<dyn CreditLedger>,
}

impl CreditGuard {
    pub fn new(ledger: Arc<dyn CreditLedger>) -> Self {
        Self { ledger }
    }

    /// Atomically check the account balance and hold `amount` credits.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InsufficientCredits`] when the balance does not
    /// cover the amount; [`PipelineError::Ledger`] on other ledger faults.
    pub async fn reserve(&self, account_id: &str, amount: u64) -> PipelineResult<Reservation> {
        match self.ledger.reserve(account_id, amount).await {
            Ok(id) => {
                debug!(account = account_id, amount, reservation = %id, "Credits reserved");
                Ok(Reservation {
                    ledger: Arc::clone(&self.ledger),
                    id,
                    amount,
                    finalized: false,
                })
            }
            Err(LedgerError::InsufficientCredits { required, balance }) => {
                debug!(account = account_id, required, balance, "Reservation rejected");
                Err(PipelineError::InsufficientCredits { required, balance })
            }
            Err(e) => Err(PipelineError::Ledger(e)),
        }
    }
}

/// A live hold on an account's balance.
///
/// Must reach exactly one terminal outcome: [`commit`](Self::commit),
/// [`rollback`](Self::rollback), or [`defuse`](Self::defuse) (which hands
/// responsibility to the commit-retry path). Dropping an unfinalized
/// reservation schedules a rollback so a panic or task cancellation cannot
/// leave the hold pending.
pub struct Reservation {
    ledger: Arc<dyn CreditLedger>,
    id: ReservationId,
    amount: u64,
    finalized: bool,
}

impl std::fmt::Debug for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("id", &self.id)
            .field("amount", &self.amount)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

impl Reservation {
    pub fn id(&self) -> &ReservationId {
        &self.id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Convert the hold into a permanent debit; returns the new balance.
    pub async fn commit(mut self) -> Result<u64, LedgerError> {
        self.finalized = true;
        self.ledger.commit(&self.id).await
    }

    /// Release the hold back to the account.
    ///
    /// A failure here is logged by the caller and does not mask the error
    /// that triggered the rollback; the ledger call itself is idempotent.
    pub async fn rollback(mut self) -> Result<(), LedgerError> {
        self.finalized = true;
        debug!(reservation = %self.id, amount = self.amount, "Rolling back reservation");
        self.ledger.rollback(&self.id).await
    }

    /// Disarm the drop backstop and hand out the raw reservation id.
    ///
    /// Used once the provider has produced output: from that point on a
    /// failed commit must NOT release the hold (the user received value);
    /// it is retried and, if still failing, surfaced for reconciliation.
    pub fn defuse(mut self) -> ReservationId {
        self.finalized = true;
        self.id.clone()
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }

        warn!(
            reservation = %self.id,
            amount = self.amount,
            "Reservation dropped without finalization, scheduling rollback"
        );

        let ledger = Arc::clone(&self.ledger);
        let id = self.id.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = ledger.rollback(&id).await {
                        error!(reservation = %id, error = %e, "Backstop rollback failed");
                    }
                });
            }
            Err(_) => {
                error!(
                    reservation = %self.id,
                    "No async runtime available for backstop rollback; reservation left pending"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryLedger;

    #[tokio::test]
    async fn reserve_then_commit_debits_once() {
        let ledger = Arc::new(InMemoryLedger::new().with_balance("acct", 5));
        let guard = CreditGuard::new(Arc::clone(&ledger) as Arc<dyn CreditLedger>);

        let reservation = guard.reserve("acct", 2).await.expect("reserved");
        let new_balance = reservation.commit().await.expect("committed");

        assert_eq!(new_balance, 3);
        assert_eq!(ledger.balance("acct").await.expect("balance"), 3);
    }

    #[tokio::test]
    async fn reserve_maps_insufficient_credits() {
        let ledger = Arc::new(InMemoryLedger::new().with_balance("acct", 1));
        let guard = CreditGuard::new(Arc::clone(&ledger) as Arc<dyn CreditLedger>);

        let err = guard.reserve("acct", 2).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientCredits { required: 2, balance: 1 }
        ));
        assert_eq!(ledger.balance("acct").await.expect("balance"), 1);
    }

    #[tokio::test]
    async fn rollback_restores_balance() {
        let ledger = Arc::new(InMemoryLedger::new().with_balance("acct", 5));
        let guard = CreditGuard::new(Arc::clone(&ledger) as Arc<dyn CreditLedger>);

        let reservation = guard.reserve("acct", 3).await.expect("reserved");
        assert_eq!(ledger.balance("acct").await.expect("balance"), 2);

        reservation.rollback().await.expect("rolled back");
        assert_eq!(ledger.balance("acct").await.expect("balance"), 5);
    }

    #[tokio::test]
    async fn dropped_reservation_is_rolled_back() {
        let ledger = Arc::new(InMemoryLedger::new().with_balance("acct", 5));
        let guard = CreditGuard::new(Arc::clone(&ledger) as Arc<dyn CreditLedger>);

        {
            let _reservation = guard.reserve("acct", 4).await.expect("reserved");
            assert_eq!(ledger.balance("acct").await.expect("balance"), 1);
            // dropped here without commit or rollback
        }

        // the backstop rollback runs on a spawned task
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(ledger.balance("acct").await.expect("balance"), 5);
        assert_eq!(ledger.rollback_calls(), 1);
    }

    #[tokio::test]
    async fn defused_reservation_is_not_rolled_back_on_drop() {
        let ledger = Arc::new(InMemoryLedger::new().with_balance("acct", 5));
        let guard = CreditGuard::new(Arc::clone(&ledger) as Arc<dyn CreditLedger>);

        let reservation = guard.reserve("acct", 2).await.expect("reserved");
        let id = reservation.defuse();
        drop(id);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(ledger.rollback_calls(), 0);
        // hold is still in place, pending the commit path
        assert_eq!(ledger.balance("acct").await.expect("balance"), 3);
    }
}
