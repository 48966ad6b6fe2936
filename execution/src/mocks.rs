//! Deterministic fixtures for tests, demos and simulations.

use std::collections::{BTreeMap, BTreeSet};

use baccarat_types::table::{Fulfillment, RandomWord, RequestToken, WORD_LEN};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    Signer,
};
use commonware_math::algebra::Random;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::{StakeLimits, TableConfig},
    round_scheduler::PhaseConfig,
    treasury::{TransferError, Treasury},
};

/// Creates an account keypair for Ed25519 signatures used by participants
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let mut rng = StdRng::seed_from_u64(seed);
    let private = PrivateKey::random(&mut rng);
    let public = private.public_key();
    (private, public)
}

/// A random word whose first lane deals exactly `rank` (1..=13).
pub fn word_for_rank(rank: u8) -> RandomWord {
    let mut word = [0u8; WORD_LEN];
    word[..8].copy_from_slice(&(rank.saturating_sub(1) as u64).to_be_bytes());
    word
}

/// Table config with permissive limits for the given keys.
pub fn table_config(admin: &PublicKey, provider: &PublicKey) -> TableConfig {
    TableConfig {
        admin: admin.clone(),
        provider: provider.clone(),
        limits: StakeLimits {
            min_stake: 1,
            max_stake: 1_000_000,
            max_outcome_total: 100_000_000,
        },
        history_capacity: 10,
        phases: PhaseConfig::new(30_000, 60_000),
    }
}

/// Randomness provider that signs whatever it is told to deal.
pub struct MockProvider {
    signer: PrivateKey,
}

impl MockProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            signer: create_account_keypair(seed).0,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    /// Fulfill `token` with words dealing exactly `ranks`.
    pub fn fulfill(&self, token: RequestToken, ranks: &[u8]) -> Fulfillment {
        let words = ranks.iter().map(|rank| word_for_rank(*rank)).collect();
        Fulfillment::sign(&self.signer, token, words)
    }

    /// Fulfill `token` with `count` words drawn from `rng`.
    pub fn fulfill_random<R: Rng>(&self, token: RequestToken, count: usize, rng: &mut R) -> Fulfillment {
        let words = (0..count)
            .map(|_| {
                let mut word = [0u8; WORD_LEN];
                rng.fill(&mut word[..]);
                word
            })
            .collect();
        Fulfillment::sign(&self.signer, token, words)
    }
}

/// Treasury backed by in-memory balances, with per-recipient failure injection.
#[derive(Clone, Debug, Default)]
pub struct MemoryTreasury {
    held: u64,
    wallets: BTreeMap<PublicKey, u64>,
    rejected: BTreeSet<PublicKey>,
}

impl MemoryTreasury {
    /// Start with `house` already in custody.
    pub fn new(house: u64) -> Self {
        Self {
            held: house,
            ..Default::default()
        }
    }

    pub fn deposit_house(&mut self, amount: u64) {
        self.held = self.held.saturating_add(amount);
    }

    pub fn fund(&mut self, participant: &PublicKey, amount: u64) {
        let balance = self.wallets.entry(participant.clone()).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, participant: &PublicKey) -> u64 {
        self.wallets.get(participant).copied().unwrap_or(0)
    }

    pub fn reject_transfers_to(&mut self, participant: &PublicKey) {
        self.rejected.insert(participant.clone());
    }

    pub fn accept_transfers_to(&mut self, participant: &PublicKey) {
        self.rejected.remove(participant);
    }
}

impl Treasury for MemoryTreasury {
    fn held(&self) -> u64 {
        self.held
    }

    fn collect(&mut self, from: &PublicKey, amount: u64) -> Result<(), TransferError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.wallets.insert(from.clone(), available - amount);
        self.held = self.held.saturating_add(amount);
        Ok(())
    }

    fn transfer(&mut self, to: &PublicKey, amount: u64) -> Result<(), TransferError> {
        if self.rejected.contains(to) {
            return Err(TransferError::Rejected("recipient refuses transfers".into()));
        }
        if self.held < amount {
            return Err(TransferError::InsufficientFunds {
                needed: amount,
                available: self.held,
            });
        }
        self.held -= amount;
        self.fund(to, amount);
        Ok(())
    }
}
