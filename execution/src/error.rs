use baccarat_types::table::{HandError, Outcome, Phase, RequestKind, RequestToken};
use thiserror::Error;

use crate::treasury::TransferError;

/// Caller input rejected before any state change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("operation not allowed in phase {phase:?}")]
    WrongPhase { phase: Phase },
    #[error("betting closed (deadline={deadline_ms}, now={now_ms})")]
    DeadlinePassed { deadline_ms: u64, now_ms: u64 },
    #[error("stake amount out of bounds (got={amount}, min={min}, max={max})")]
    InvalidAmount { amount: u64, min: u64, max: u64 },
    #[error("participant already holds a stake this round")]
    DuplicateStake,
    #[error("{outcome} total would exceed its cap (total={total}, cap={cap})")]
    OutcomeCapExceeded { outcome: Outcome, total: u64, cap: u64 },
    #[error("no stakes placed")]
    NoStakes,
    #[error("held balance is zero")]
    EmptyBalance,
    #[error("no commission to withdraw")]
    NothingToWithdraw,
    #[error("deal not stalled yet (expires_at={expires_at_ms}, now={now_ms})")]
    DealNotStalled { expires_at_ms: u64, now_ms: u64 },
    #[error("stake funds not collected: {0}")]
    FundsNotCollected(TransferError),
}

/// Randomness fulfillment that does not answer the outstanding request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("fulfillment received outside dealing (phase={phase:?})")]
    NotDealing { phase: Phase },
    #[error("no randomness request outstanding")]
    NoPendingRequest,
    #[error("a randomness request is already outstanding")]
    RequestOutstanding,
    #[error("request token mismatch (expected={expected:?}, got={got:?})")]
    TokenMismatch {
        expected: RequestToken,
        got: RequestToken,
    },
    #[error("fulfillment answers the wrong request (expected={expected:?}, got={got:?})")]
    WrongRequestKind {
        expected: RequestKind,
        got: RequestKind,
    },
    #[error("wrong number of random words (expected={expected}, got={got})")]
    WrongWordCount { expected: usize, got: usize },
    #[error("fulfillment not signed by the configured provider")]
    UnauthorizedProvider,
    #[error("fulfillment deals an invalid hand: {0}")]
    InvalidDeal(HandError),
}

/// A single transfer that could not be executed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountingError {
    #[error("insufficient held balance (needed={needed}, held={held})")]
    InsufficientHeldBalance { needed: u64, held: u64 },
    #[error("transfer failed: {0}")]
    TransferFailed(TransferError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("caller is not the table administrator")]
    Unauthorized,
    #[error("table is paused")]
    Paused,
    #[error("table is already paused")]
    AlreadyPaused,
    #[error("table is not paused")]
    NotPaused,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Accounting(#[from] AccountingError),
    #[error(transparent)]
    Admin(#[from] AdminError),
}
