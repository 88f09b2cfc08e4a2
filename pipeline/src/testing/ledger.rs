//! In-memory credit ledger
//!
//! Test double for [`CreditLedger`] with the same atomicity contract a
//! real backing store must honor: the balance check and the hold happen
//! under one lock, so concurrent reservations cannot overdraw. Call
//! counters and injectable commit failures support pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::spi::{CreditLedger, LedgerError, ReservationId, ReservationState};

#[derive(Debug)]
struct ReservationRecord {
    account_id: String,
    amount: u64,
    state: ReservationState,
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<String, u64>,
    reservations: HashMap<ReservationId, ReservationRecord>,
}

/// In-memory [`CreditLedger`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    commit_calls: AtomicU64,
    rollback_calls: AtomicU64,
    failing_commits: AtomicU64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account balance.
    pub fn with_balance(self, account_id: &str, credits: u64) -> Self {
        self.state
            .lock()
            .balances
            .insert(account_id.to_string(), credits);
        self
    }

    /// Make the next `n` commit calls fail with a transient error.
    pub fn fail_next_commits(&self, n: u64) {
        self.failing_commits.store(n, Ordering::SeqCst);
    }

    /// Number of times `commit()` was called.
    pub fn commit_calls(&self) -> u64 {
        self.commit_calls.load(Ordering::Relaxed)
    }

    /// Number of times `rollback()` was called.
    pub fn rollback_calls(&self) -> u64 {
        self.rollback_calls.load(Ordering::Relaxed)
    }

    /// State of a reservation, if it exists.
    pub fn reservation_state(&self, id: &ReservationId) -> Option<ReservationState> {
        self.state.lock().reservations.get(id).map(|r| r.state)
    }

    /// Number of reservations still pending.
    pub fn pending_reservations(&self) -> usize {
        self.state
            .lock()
            .reservations
            .values()
            .filter(|r| r.state == ReservationState::Pending)
            .count()
    }
}

#[async_trait]
impl CreditLedger for InMemoryLedger {
    async fn balance(&self, account_id: &str) -> Result<u64, LedgerError> {
        Ok(self
            .state
            .lock()
            .balances
            .get(account_id)
            .copied()
            .unwrap_or(0))
    }

    async fn reserve(&self, account_id: &str, amount: u64) -> Result<ReservationId, LedgerError> {
        let mut state = self.state.lock();
        let balance = state
            .balances
            .entry(account_id.to_string())
            .or_insert(0);

        if *balance < amount {
            return Err(LedgerError::InsufficientCredits {
                required: amount,
                balance: *balance,
            });
        }

        *balance -= amount;
        let id = ReservationId::generate();
        state.reservations.insert(
            id.clone(),
            ReservationRecord {
                account_id: account_id.to_string(),
                amount,
                state: ReservationState::Pending,
            },
        );
        Ok(id)
    }

    async fn commit(&self, reservation: &ReservationId) -> Result<u64, LedgerError> {
        self.commit_calls.fetch_add(1, Ordering::Relaxed);

        // injected transient failures happen before any state change, so a
        // later retry of the same reservation is safe
        if self
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(LedgerError::Unavailable("injected commit failure".to_string()));
        }

        let mut state = self.state.lock();
        let record = state
            .reservations
            .get_mut(reservation)
            .ok_or_else(|| LedgerError::UnknownReservation(reservation.to_string()))?;

        match record.state {
            ReservationState::Pending => {
                record.state = ReservationState::Committed;
                let account_id = record.account_id.clone();
                Ok(state.balances.get(&account_id).copied().unwrap_or(0))
            }
            ReservationState::Committed | ReservationState::RolledBack => {
                Err(LedgerError::InvalidState(reservation.to_string()))
            }
        }
    }

    async fn rollback(&self, reservation: &ReservationId) -> Result<(), LedgerError> {
        self.rollback_calls.fetch_add(1, Ordering::Relaxed);

        let mut state = self.state.lock();
        let record = state
            .reservations
            .get_mut(reservation)
            .ok_or_else(|| LedgerError::UnknownReservation(reservation.to_string()))?;

        match record.state {
            ReservationState::Pending => {
                record.state = ReservationState::RolledBack;
                let account_id = record.account_id.clone();
                let amount = record.amount;
                *state.balances.entry(account_id).or_insert(0) += amount;
                Ok(())
            }
            // idempotent: a second rollback must not credit twice
            ReservationState::RolledBack => Ok(()),
            ReservationState::Committed => Err(LedgerError::InvalidState(reservation.to_string())),
        }
    }
}
