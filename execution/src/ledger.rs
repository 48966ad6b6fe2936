//! Stakes of the live round.
//!
//! Insertion order is preserved because settlement pays out in that order.

use std::collections::BTreeMap;

use baccarat_types::table::{Outcome, OutcomeTotals, Stake};
use commonware_cryptography::ed25519::PublicKey;

use crate::{config::StakeLimits, error::ValidationError};

#[derive(Clone, Debug)]
pub struct BetLedger {
    limits: StakeLimits,
    stakes: Vec<Stake>,
    index: BTreeMap<PublicKey, usize>,
    totals: OutcomeTotals,
}

impl BetLedger {
    pub fn new(limits: StakeLimits) -> Self {
        Self {
            limits,
            stakes: Vec::new(),
            index: BTreeMap::new(),
            totals: OutcomeTotals::default(),
        }
    }

    /// Rebuild a ledger from persisted stakes, re-applying every admission check.
    pub fn restore(limits: StakeLimits, stakes: Vec<Stake>) -> Result<Self, ValidationError> {
        let mut ledger = Self::new(limits);
        for stake in stakes {
            ledger.place_stake(stake.participant, stake.amount, stake.outcome)?;
        }
        Ok(ledger)
    }

    /// Check whether `stake` would be admitted, without recording it.
    pub fn check(&self, stake: &Stake) -> Result<(), ValidationError> {
        if self.index.contains_key(&stake.participant) {
            return Err(ValidationError::DuplicateStake);
        }
        if stake.amount < self.limits.min_stake || stake.amount > self.limits.max_stake {
            return Err(ValidationError::InvalidAmount {
                amount: stake.amount,
                min: self.limits.min_stake,
                max: self.limits.max_stake,
            });
        }
        let current = self.totals.get(stake.outcome);
        match current.checked_add(stake.amount) {
            Some(total) if total <= self.limits.max_outcome_total => Ok(()),
            total => Err(ValidationError::OutcomeCapExceeded {
                outcome: stake.outcome,
                total: total.unwrap_or(u64::MAX),
                cap: self.limits.max_outcome_total,
            }),
        }
    }

    pub fn place_stake(
        &mut self,
        participant: PublicKey,
        amount: u64,
        outcome: Outcome,
    ) -> Result<(), ValidationError> {
        let stake = Stake {
            participant,
            amount,
            outcome,
        };
        self.check(&stake)?;
        *self.totals.get_mut(stake.outcome) += stake.amount;
        self.index.insert(stake.participant.clone(), self.stakes.len());
        self.stakes.push(stake);
        Ok(())
    }

    pub fn stake(&self, participant: &PublicKey) -> Option<&Stake> {
        self.index.get(participant).map(|idx| &self.stakes[*idx])
    }

    pub fn stakes(&self) -> &[Stake] {
        &self.stakes
    }

    pub fn totals(&self) -> OutcomeTotals {
        self.totals
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    pub fn clear(&mut self) {
        self.take();
    }

    /// Drain every stake in insertion order, leaving the ledger empty.
    pub fn take(&mut self) -> Vec<Stake> {
        self.index.clear();
        self.totals = OutcomeTotals::default();
        std::mem::take(&mut self.stakes)
    }
}
