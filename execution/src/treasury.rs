//! Value-transfer seam.
//!
//! The engine never moves value itself. Stakes are collected into custody and payouts
//! are sent out through a [`Treasury`], whose individual operations are assumed atomic.

use commonware_cryptography::ed25519::PublicKey;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds (needed={needed}, available={available})")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

pub trait Treasury {
    /// Balance currently held in the table's custody.
    fn held(&self) -> u64;

    /// Move `amount` from `from` into custody.
    fn collect(&mut self, from: &PublicKey, amount: u64) -> Result<(), TransferError>;

    /// Move `amount` out of custody to `to`.
    fn transfer(&mut self, to: &PublicKey, amount: u64) -> Result<(), TransferError>;
}
