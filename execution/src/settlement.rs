//! Payout computation and transfer execution.
//!
//! Settlement runs in two passes. The first computes every payout and clears the
//! ledger, so no accounting state is left pointing at stakes that are being paid.
//! The second executes transfers in insertion order; a failed transfer is recorded
//! and the remaining ones still go out.

use baccarat_types::table::{Outcome, OutcomeTotals, Round, Stake};
use commonware_cryptography::ed25519::PublicKey;
use tracing::{debug, error};

use crate::{error::AccountingError, ledger::BetLedger, treasury::Treasury};

/// Payout multipliers (total returned per unit staked, stake included).
pub(crate) mod payouts {
    /// Player pays 1:1.
    pub const PLAYER: u64 = 2;
    /// Tie pays 8:1.
    pub const TIE: u64 = 9;
    /// Banker pays 0.95:1, expressed as gross percent before commission.
    pub const BANKER_GROSS_PERCENT: u128 = 195;
    /// House commission on winning Banker stakes.
    pub const COMMISSION_PERCENT: u128 = 5;
    pub const PERCENT: u128 = 100;
}

/// Largest payout multiplier any stake can earn.
pub const MAX_PAYOUT_MULTIPLIER: u64 = payouts::TIE;

/// Payout and withheld commission for `amount` staked on `outcome` when `winner` wins.
pub fn outcome_payout(outcome: Outcome, amount: u64, winner: Outcome) -> (u64, u64) {
    if outcome != winner {
        return (0, 0);
    }
    match outcome {
        Outcome::Player => (amount.saturating_mul(payouts::PLAYER), 0),
        Outcome::Tie => (amount.saturating_mul(payouts::TIE), 0),
        Outcome::Banker => {
            let amount = amount as u128;
            let gross = amount * payouts::BANKER_GROSS_PERCENT / payouts::PERCENT;
            let commission = amount * payouts::COMMISSION_PERCENT / payouts::PERCENT;
            // Saturates only for amounts no validated config admits.
            let payout = u64::try_from(gross - commission).unwrap_or(u64::MAX);
            let commission = u64::try_from(commission).unwrap_or(u64::MAX);
            (payout, commission)
        }
    }
}

/// Payout and commission for a single stake.
pub fn compute_outcome(stake: &Stake, winner: Outcome) -> (u64, u64) {
    outcome_payout(stake.outcome, stake.amount, winner)
}

/// What `amount` on `outcome` would return if `outcome` won.
pub fn potential_payout(outcome: Outcome, amount: u64) -> u64 {
    outcome_payout(outcome, amount, outcome).0
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub participant: PublicKey,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedTransfer {
    pub participant: PublicKey,
    pub amount: u64,
    pub error: AccountingError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementReport {
    pub sent: Vec<Transfer>,
    pub failed: Vec<FailedTransfer>,
    /// Commission withheld by this settlement.
    pub commission: u64,
}

impl SettlementReport {
    pub fn total_sent(&self) -> u64 {
        self.sent
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.amount))
    }
}

/// Pay out every stake in the ledger against `winner`.
pub fn settle_round<T: Treasury>(
    ledger: &mut BetLedger,
    winner: Outcome,
    round: &mut Round,
    treasury: &mut T,
) -> SettlementReport {
    // Pass 1: compute and clear.
    let stakes = ledger.take();
    round.totals = OutcomeTotals::default();
    let mut owed = Vec::with_capacity(stakes.len());
    let mut commission = 0u64;
    for stake in stakes {
        let (payout, withheld) = compute_outcome(&stake, winner);
        commission = commission.saturating_add(withheld);
        if payout > 0 {
            owed.push(Transfer {
                participant: stake.participant,
                amount: payout,
            });
        }
    }
    round.commission = round.commission.saturating_add(commission);
    debug!(
        round_id = round.round_id,
        winner = %winner,
        winners = owed.len(),
        commission,
        "settlement computed"
    );

    // Pass 2: transfer.
    let (sent, failed) = execute(owed, round.commission, treasury);
    SettlementReport {
        sent,
        failed,
        commission,
    }
}

/// Return every stake in the ledger to its owner.
pub fn refund_stakes<T: Treasury>(
    ledger: &mut BetLedger,
    round: &mut Round,
    treasury: &mut T,
) -> SettlementReport {
    let owed = ledger
        .take()
        .into_iter()
        .map(|stake| Transfer {
            participant: stake.participant,
            amount: stake.amount,
        })
        .collect();
    round.totals = OutcomeTotals::default();
    let (sent, failed) = execute(owed, round.commission, treasury);
    SettlementReport {
        sent,
        failed,
        commission: 0,
    }
}

/// Send `owed` out of custody. The `reserved` commission is never spent on transfers.
fn execute<T: Treasury>(
    owed: Vec<Transfer>,
    reserved: u64,
    treasury: &mut T,
) -> (Vec<Transfer>, Vec<FailedTransfer>) {
    let mut sent = Vec::with_capacity(owed.len());
    let mut failed = Vec::new();
    for transfer in owed {
        let held = treasury.held();
        let result = if held.saturating_sub(reserved) < transfer.amount {
            Err(AccountingError::InsufficientHeldBalance {
                needed: transfer.amount,
                held,
            })
        } else {
            treasury
                .transfer(&transfer.participant, transfer.amount)
                .map_err(AccountingError::TransferFailed)
        };
        match result {
            Ok(()) => sent.push(transfer),
            Err(error) => {
                error!(
                    participant = ?transfer.participant,
                    amount = transfer.amount,
                    ?error,
                    "transfer failed"
                );
                failed.push(FailedTransfer {
                    participant: transfer.participant,
                    amount: transfer.amount,
                    error,
                });
            }
        }
    }
    (sent, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::StakeLimits,
        mocks::{create_account_keypair, MemoryTreasury},
        treasury::TransferError,
    };
    use proptest::prelude::*;

    fn ledger_with(stakes: &[(u64, Outcome, u64)], treasury: &mut MemoryTreasury) -> BetLedger {
        let mut ledger = BetLedger::new(StakeLimits {
            min_stake: 1,
            max_stake: 1_000_000,
            max_outcome_total: 10_000_000,
        });
        for (seed, outcome, amount) in stakes {
            let participant = create_account_keypair(*seed).1;
            treasury.fund(&participant, *amount);
            treasury.collect(&participant, *amount).unwrap();
            ledger.place_stake(participant, *amount, *outcome).unwrap();
        }
        ledger
    }

    #[test]
    fn test_payout_table() {
        assert_eq!(outcome_payout(Outcome::Player, 100, Outcome::Player), (200, 0));
        assert_eq!(outcome_payout(Outcome::Tie, 100, Outcome::Tie), (900, 0));
        assert_eq!(outcome_payout(Outcome::Banker, 100, Outcome::Banker), (190, 5));
        // Losing stakes and Player/Banker stakes on a tie return nothing.
        assert_eq!(outcome_payout(Outcome::Player, 100, Outcome::Tie), (0, 0));
        assert_eq!(outcome_payout(Outcome::Banker, 100, Outcome::Tie), (0, 0));
        assert_eq!(outcome_payout(Outcome::Tie, 100, Outcome::Banker), (0, 0));
    }

    #[test]
    fn test_banker_rounding() {
        // floor(1.95) - floor(0.05) = 1
        assert_eq!(outcome_payout(Outcome::Banker, 1, Outcome::Banker), (1, 0));
        // floor(39) - floor(1) = 38
        assert_eq!(outcome_payout(Outcome::Banker, 20, Outcome::Banker), (38, 1));
        // floor(64.35) - floor(1.65) = 63
        assert_eq!(outcome_payout(Outcome::Banker, 33, Outcome::Banker), (63, 1));
    }

    #[test]
    fn test_potential_payout() {
        assert_eq!(potential_payout(Outcome::Player, 7), 14);
        assert_eq!(potential_payout(Outcome::Tie, 7), 63);
        assert_eq!(potential_payout(Outcome::Banker, 7), 13);
    }

    #[test]
    fn test_settle_pays_winners_in_order() {
        let mut treasury = MemoryTreasury::new(0);
        let mut ledger = ledger_with(
            &[
                (1, Outcome::Player, 1),
                (2, Outcome::Banker, 2),
                (3, Outcome::Player, 5),
            ],
            &mut treasury,
        );
        let mut round = Round::new(1, 0);
        round.totals = ledger.totals();
        treasury.deposit_house(100);

        let report = settle_round(&mut ledger, Outcome::Player, &mut round, &mut treasury);
        assert_eq!(
            report.sent,
            vec![
                Transfer {
                    participant: create_account_keypair(1).1,
                    amount: 2,
                },
                Transfer {
                    participant: create_account_keypair(3).1,
                    amount: 10,
                },
            ]
        );
        assert!(report.failed.is_empty());
        assert_eq!(report.commission, 0);
        assert!(ledger.is_empty());
        assert!(round.totals.is_empty());
        assert_eq!(treasury.balance_of(&create_account_keypair(1).1), 2);
        assert_eq!(treasury.balance_of(&create_account_keypair(2).1), 0);
    }

    #[test]
    fn test_settle_accumulates_commission() {
        let mut treasury = MemoryTreasury::new(1_000);
        let mut ledger = ledger_with(&[(1, Outcome::Banker, 100), (2, Outcome::Banker, 40)], &mut treasury);
        let mut round = Round::new(1, 0);
        round.commission = 3;

        let report = settle_round(&mut ledger, Outcome::Banker, &mut round, &mut treasury);
        assert_eq!(report.commission, 7);
        assert_eq!(round.commission, 10);
        assert_eq!(report.total_sent(), 190 + 76);
    }

    #[test]
    fn test_failed_transfer_does_not_block_others() {
        let mut treasury = MemoryTreasury::new(1_000);
        let mut ledger = ledger_with(
            &[
                (1, Outcome::Tie, 10),
                (2, Outcome::Tie, 10),
                (3, Outcome::Tie, 10),
            ],
            &mut treasury,
        );
        treasury.reject_transfers_to(&create_account_keypair(2).1);
        let mut round = Round::new(1, 0);

        let report = settle_round(&mut ledger, Outcome::Tie, &mut round, &mut treasury);
        assert_eq!(report.sent.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].participant, create_account_keypair(2).1);
        assert!(matches!(
            report.failed[0].error,
            AccountingError::TransferFailed(TransferError::Rejected(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_insufficient_held_balance() {
        let mut treasury = MemoryTreasury::new(0);
        let mut ledger = ledger_with(&[(1, Outcome::Tie, 10), (2, Outcome::Player, 10)], &mut treasury);
        let mut round = Round::new(1, 0);

        // Held is 20; the tie payout of 90 cannot be covered.
        let report = settle_round(&mut ledger, Outcome::Tie, &mut round, &mut treasury);
        assert!(report.sent.is_empty());
        assert_eq!(
            report.failed[0].error,
            AccountingError::InsufficientHeldBalance {
                needed: 90,
                held: 20
            }
        );
        assert_eq!(treasury.held(), 20);
    }

    #[test]
    fn test_payouts_leave_commission_in_custody() {
        let mut treasury = MemoryTreasury::new(10);
        let mut ledger = ledger_with(&[(1, Outcome::Player, 7)], &mut treasury);
        let mut round = Round::new(2, 0);
        round.commission = 5;

        // Held is 17 but 5 of it is commission; the 14 payout cannot be covered.
        let report = settle_round(&mut ledger, Outcome::Player, &mut round, &mut treasury);
        assert!(report.sent.is_empty());
        assert_eq!(
            report.failed[0].error,
            AccountingError::InsufficientHeldBalance {
                needed: 14,
                held: 17
            }
        );
        assert_eq!(treasury.held(), 17);
        assert_eq!(round.commission, 5);
    }

    #[test]
    fn test_refund_returns_exact_amounts() {
        let mut treasury = MemoryTreasury::new(0);
        let mut ledger = ledger_with(&[(1, Outcome::Player, 30), (2, Outcome::Banker, 70)], &mut treasury);
        let mut round = Round::new(1, 0);
        round.totals = ledger.totals();

        let report = refund_stakes(&mut ledger, &mut round, &mut treasury);
        assert_eq!(report.total_sent(), 100);
        assert_eq!(treasury.held(), 0);
        assert_eq!(treasury.balance_of(&create_account_keypair(1).1), 30);
        assert_eq!(treasury.balance_of(&create_account_keypair(2).1), 70);
        assert!(round.totals.is_empty());
    }

    proptest! {
        #[test]
        fn potential_payout_matches_multipliers(amount in 1u64..=1_000_000_000_000) {
            prop_assert_eq!(potential_payout(Outcome::Player, amount), amount * 2);
            prop_assert_eq!(potential_payout(Outcome::Tie, amount), amount * 9);
            let banker = potential_payout(Outcome::Banker, amount);
            prop_assert_eq!(banker, amount * 195 / 100 - amount * 5 / 100);
            prop_assert!(banker <= amount * 2);
        }
    }
}
