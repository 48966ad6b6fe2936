use baccarat_types::table::{
    Hand, Outcome, OutcomeTotals, RequestKind, RequestToken, RoundSummary,
};
use commonware_cryptography::ed25519::PublicKey;

use crate::{error::AccountingError, settlement::SettlementReport};

/// Observable effect of a table operation, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    StakePlaced {
        round_id: u64,
        participant: PublicKey,
        outcome: Outcome,
        amount: u64,
    },
    BettingClosed {
        round_id: u64,
        stakes: usize,
        totals: OutcomeTotals,
    },
    RandomnessRequested {
        round_id: u64,
        token: RequestToken,
        kind: RequestKind,
    },
    CardsDealt {
        round_id: u64,
        kind: RequestKind,
        player: Hand,
        banker: Hand,
    },
    RoundResolved {
        summary: RoundSummary,
    },
    PayoutSent {
        round_id: u64,
        participant: PublicKey,
        amount: u64,
    },
    StakeRefunded {
        round_id: u64,
        participant: PublicKey,
        amount: u64,
    },
    /// A payout or refund that could not be delivered. The amount stays in custody.
    PayoutFailed {
        round_id: u64,
        participant: PublicKey,
        amount: u64,
        error: AccountingError,
    },
    RoundCancelled {
        round_id: u64,
        betting_ends_at_ms: u64,
    },
    RoundStarted {
        round_id: u64,
        betting_ends_at_ms: u64,
    },
    DealExpired {
        round_id: u64,
        token: RequestToken,
    },
    Paused,
    Unpaused,
    CommissionWithdrawn {
        to: PublicKey,
        amount: u64,
    },
}

/// Transfer events for a settlement, sent ones first in transfer order.
pub(crate) fn transfer_events(round_id: u64, report: SettlementReport, refund: bool) -> Vec<Event> {
    let mut events = Vec::with_capacity(report.sent.len() + report.failed.len());
    for transfer in report.sent {
        events.push(if refund {
            Event::StakeRefunded {
                round_id,
                participant: transfer.participant,
                amount: transfer.amount,
            }
        } else {
            Event::PayoutSent {
                round_id,
                participant: transfer.participant,
                amount: transfer.amount,
            }
        });
    }
    for failure in report.failed {
        events.push(Event::PayoutFailed {
            round_id,
            participant: failure.participant,
            amount: failure.amount,
            error: failure.error,
        });
    }
    events
}
