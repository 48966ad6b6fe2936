//! The baccarat table: one live round, driven by explicit calls.
//!
//! Every mutating operation takes the caller-supplied `now_ms`, validates fully
//! before touching state, and returns the events it produced. A rejected call leaves
//! the table exactly as it was.

use anyhow::{bail, Context as _};
use baccarat_types::{
    storage::{Key, Value},
    table::{
        Fulfillment, Hand, Outcome, OutcomeTotals, PendingRequest, Phase, RequestKind, Round,
        RoundSummary, Stake,
    },
};
use commonware_cryptography::ed25519::PublicKey;
use tracing::{debug, info, warn};

use crate::{
    config::TableConfig,
    error::{AccountingError, AdminError, ProtocolError, TableError, ValidationError},
    events::{transfer_events, Event},
    gateway::RandomnessGateway,
    hand::{banker_draws, card_value, needs_third_card, player_draws, winner},
    history::HistoryLog,
    ledger::BetLedger,
    logging::format_hand,
    round_scheduler::RoundScheduler,
    settlement::{self, potential_payout},
    state::State,
    treasury::Treasury,
};

pub struct Table<T: Treasury> {
    config: TableConfig,
    scheduler: RoundScheduler,
    gateway: RandomnessGateway,
    round: Round,
    ledger: BetLedger,
    history: HistoryLog,
    treasury: T,
}

impl<T: Treasury> Table<T> {
    /// Open the table with round 1 accepting stakes from `now_ms`.
    pub fn new(config: TableConfig, treasury: T, now_ms: u64) -> Self {
        let scheduler = RoundScheduler::new(config.phases);
        let round = Round::new(1, scheduler.betting_deadline(now_ms));
        Self {
            gateway: RandomnessGateway::new(config.provider.clone()),
            ledger: BetLedger::new(config.limits),
            history: HistoryLog::new(config.history_capacity),
            scheduler,
            round,
            config,
            treasury,
        }
    }

    // --- Queries ---

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn round_id(&self) -> u64 {
        self.round.round_id
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    pub fn betting_deadline(&self) -> u64 {
        self.round.betting_ends_at_ms
    }

    pub fn stake(&self, participant: &PublicKey) -> Option<&Stake> {
        self.ledger.stake(participant)
    }

    pub fn stakes(&self) -> &[Stake] {
        self.ledger.stakes()
    }

    pub fn hands(&self) -> (&Hand, &Hand) {
        (&self.round.player, &self.round.banker)
    }

    pub fn outcome_totals(&self) -> OutcomeTotals {
        self.round.totals
    }

    pub fn potential_payout(&self, outcome: Outcome, amount: u64) -> u64 {
        potential_payout(outcome, amount)
    }

    /// Resolved rounds, oldest first.
    pub fn history(&self) -> Vec<RoundSummary> {
        self.history.to_vec()
    }

    pub fn pending_request(&self) -> Option<&PendingRequest> {
        self.round.pending.as_ref()
    }

    pub fn commission(&self) -> u64 {
        self.round.commission
    }

    pub fn is_paused(&self) -> bool {
        self.round.paused
    }

    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    pub fn treasury_mut(&mut self) -> &mut T {
        &mut self.treasury
    }

    // --- Participants ---

    pub fn place_stake(
        &mut self,
        participant: &PublicKey,
        outcome: Outcome,
        amount: u64,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        if self.round.paused {
            return Err(AdminError::Paused.into());
        }
        if self.round.phase != Phase::Betting {
            return Err(ValidationError::WrongPhase {
                phase: self.round.phase,
            }
            .into());
        }
        if !RoundScheduler::is_betting_open(self.round.phase, self.round.betting_ends_at_ms, now_ms)
        {
            return Err(ValidationError::DeadlinePassed {
                deadline_ms: self.round.betting_ends_at_ms,
                now_ms,
            }
            .into());
        }
        self.ledger.check(&Stake {
            participant: participant.clone(),
            amount,
            outcome,
        })?;
        self.treasury
            .collect(participant, amount)
            .map_err(ValidationError::FundsNotCollected)?;
        self.ledger.place_stake(participant.clone(), amount, outcome)?;
        self.round.totals = self.ledger.totals();

        debug!(
            round_id = self.round.round_id,
            outcome = %outcome,
            amount,
            "stake placed"
        );
        Ok(vec![Event::StakePlaced {
            round_id: self.round.round_id,
            participant: participant.clone(),
            outcome,
            amount,
        }])
    }

    // --- Dealing ---

    pub fn close_betting_and_deal(
        &mut self,
        caller: &PublicKey,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        if self.round.phase != Phase::Betting {
            return Err(ValidationError::WrongPhase {
                phase: self.round.phase,
            }
            .into());
        }
        if self.ledger.is_empty() {
            return Err(ValidationError::NoStakes.into());
        }
        if self.treasury.held() == 0 {
            return Err(ValidationError::EmptyBalance.into());
        }
        let token = self.gateway.request_initial(&mut self.round, now_ms)?;
        self.round.phase = Phase::Dealing;

        info!(
            round_id = self.round.round_id,
            stakes = self.ledger.len(),
            "betting closed"
        );
        Ok(vec![
            Event::BettingClosed {
                round_id: self.round.round_id,
                stakes: self.ledger.len(),
                totals: self.round.totals,
            },
            Event::RandomnessRequested {
                round_id: self.round.round_id,
                token,
                kind: RequestKind::Initial,
            },
        ])
    }

    pub fn on_initial_fulfillment(
        &mut self,
        fulfillment: &Fulfillment,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.deal_initial(fulfillment, now_ms).inspect_err(|err| {
            warn!(round_id = self.round.round_id, ?err, "initial fulfillment rejected")
        })
    }

    pub fn on_additional_fulfillment(
        &mut self,
        fulfillment: &Fulfillment,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.deal_additional(fulfillment, now_ms).inspect_err(|err| {
            warn!(round_id = self.round.round_id, ?err, "additional fulfillment rejected")
        })
    }

    fn deal_initial(
        &mut self,
        fulfillment: &Fulfillment,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.ensure_dealing()?;
        let ranks = self
            .gateway
            .validate(&self.round, RequestKind::Initial, fulfillment)?;
        // Word order: player, player, banker, banker.
        let [p1, p2, b1, b2] = ranks.as_slice() else {
            return Err(ProtocolError::WrongWordCount {
                expected: RequestKind::Initial.expected_words(),
                got: ranks.len(),
            }
            .into());
        };
        let player = Hand::from_ranks(&[*p1, *p2]).map_err(ProtocolError::InvalidDeal)?;
        let banker = Hand::from_ranks(&[*b1, *b2]).map_err(ProtocolError::InvalidDeal)?;

        self.gateway.consume(&mut self.round);
        self.round.player = player;
        self.round.banker = banker;
        debug!(
            round_id = self.round.round_id,
            player = %format_hand(&self.round.player),
            banker = %format_hand(&self.round.banker),
            "initial cards dealt"
        );

        let mut events = vec![Event::CardsDealt {
            round_id: self.round.round_id,
            kind: RequestKind::Initial,
            player: self.round.player.clone(),
            banker: self.round.banker.clone(),
        }];
        if needs_third_card(self.round.player.value(), self.round.banker.value()) {
            let token = self.gateway.request_additional(&mut self.round, now_ms)?;
            events.push(Event::RandomnessRequested {
                round_id: self.round.round_id,
                token,
                kind: RequestKind::Additional,
            });
        } else {
            self.resolve(now_ms, &mut events);
        }
        Ok(events)
    }

    fn deal_additional(
        &mut self,
        fulfillment: &Fulfillment,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.ensure_dealing()?;
        let ranks = self
            .gateway
            .validate(&self.round, RequestKind::Additional, fulfillment)?;
        let [player_rank, banker_rank] = ranks.as_slice() else {
            return Err(ProtocolError::WrongWordCount {
                expected: RequestKind::Additional.expected_words(),
                got: ranks.len(),
            }
            .into());
        };

        // Word 0 is the Player's third card, word 1 the Banker's; unused words are discarded.
        let mut player = self.round.player.clone();
        let mut banker = self.round.banker.clone();
        let player_third = if player_draws(player.value()) {
            player
                .push(*player_rank)
                .map_err(ProtocolError::InvalidDeal)?;
            Some(card_value(*player_rank))
        } else {
            None
        };
        if banker_draws(banker.value(), player_third) {
            banker
                .push(*banker_rank)
                .map_err(ProtocolError::InvalidDeal)?;
        }

        self.gateway.consume(&mut self.round);
        self.round.player = player;
        self.round.banker = banker;
        debug!(
            round_id = self.round.round_id,
            player = %format_hand(&self.round.player),
            banker = %format_hand(&self.round.banker),
            "third cards dealt"
        );

        let mut events = vec![Event::CardsDealt {
            round_id: self.round.round_id,
            kind: RequestKind::Additional,
            player: self.round.player.clone(),
            banker: self.round.banker.clone(),
        }];
        self.resolve(now_ms, &mut events);
        Ok(events)
    }

    fn resolve(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        let player_value = self.round.player.value();
        let banker_value = self.round.banker.value();
        let winner = winner(player_value, banker_value);
        self.round.phase = Phase::Ended;

        let summary = RoundSummary {
            round_id: self.round.round_id,
            winner,
            player_value,
            banker_value,
            timestamp_ms: now_ms,
        };
        self.history.push(summary.clone());
        info!(
            round_id = self.round.round_id,
            winner = %winner,
            player_value,
            banker_value,
            "round resolved"
        );
        events.push(Event::RoundResolved { summary });

        let report = settlement::settle_round(
            &mut self.ledger,
            winner,
            &mut self.round,
            &mut self.treasury,
        );
        events.extend(transfer_events(self.round.round_id, report, false));
    }

    // --- Administration ---

    pub fn start_new_round(
        &mut self,
        caller: &PublicKey,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        if !RoundScheduler::can_start_new_round(self.round.phase) {
            return Err(ValidationError::WrongPhase {
                phase: self.round.phase,
            }
            .into());
        }
        let mut round = Round::new(
            self.round.round_id.saturating_add(1),
            self.scheduler.betting_deadline(now_ms),
        );
        round.commission = self.round.commission;
        round.paused = self.round.paused;
        self.round = round;

        info!(
            round_id = self.round.round_id,
            betting_ends_at_ms = self.round.betting_ends_at_ms,
            "round started"
        );
        Ok(vec![Event::RoundStarted {
            round_id: self.round.round_id,
            betting_ends_at_ms: self.round.betting_ends_at_ms,
        }])
    }

    /// Refund every stake and reopen betting for the same round.
    pub fn cancel_round(
        &mut self,
        caller: &PublicKey,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        if self.round.phase != Phase::Betting {
            return Err(ValidationError::WrongPhase {
                phase: self.round.phase,
            }
            .into());
        }
        let report = settlement::refund_stakes(&mut self.ledger, &mut self.round, &mut self.treasury);
        self.round.betting_ends_at_ms = self.scheduler.betting_deadline(now_ms);

        info!(
            round_id = self.round.round_id,
            refunded = report.total_sent(),
            failed = report.failed.len(),
            "round cancelled"
        );
        let mut events = vec![Event::RoundCancelled {
            round_id: self.round.round_id,
            betting_ends_at_ms: self.round.betting_ends_at_ms,
        }];
        events.extend(transfer_events(self.round.round_id, report, true));
        Ok(events)
    }

    /// Abandon a deal whose randomness never arrived, refunding every stake.
    pub fn expire_stalled_deal(
        &mut self,
        caller: &PublicKey,
        now_ms: u64,
    ) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        self.ensure_dealing()?;
        let pending = self
            .round
            .pending
            .as_ref()
            .ok_or(ProtocolError::NoPendingRequest)?;
        if !self
            .scheduler
            .is_stalled(self.round.phase, Some(pending), now_ms)
        {
            return Err(ValidationError::DealNotStalled {
                expires_at_ms: self.scheduler.stall_deadline(pending),
                now_ms,
            }
            .into());
        }

        let token = pending.token;
        self.gateway.consume(&mut self.round);
        self.round.player.clear();
        self.round.banker.clear();
        self.round.phase = Phase::Ended;
        let report = settlement::refund_stakes(&mut self.ledger, &mut self.round, &mut self.treasury);

        warn!(
            round_id = self.round.round_id,
            refunded = report.total_sent(),
            "stalled deal expired"
        );
        let mut events = vec![Event::DealExpired {
            round_id: self.round.round_id,
            token,
        }];
        events.extend(transfer_events(self.round.round_id, report, true));
        Ok(events)
    }

    pub fn pause(&mut self, caller: &PublicKey) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        if self.round.paused {
            return Err(AdminError::AlreadyPaused.into());
        }
        self.round.paused = true;
        info!(round_id = self.round.round_id, "table paused");
        Ok(vec![Event::Paused])
    }

    pub fn unpause(&mut self, caller: &PublicKey) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        if !self.round.paused {
            return Err(AdminError::NotPaused.into());
        }
        self.round.paused = false;
        info!(round_id = self.round.round_id, "table unpaused");
        Ok(vec![Event::Unpaused])
    }

    /// Send all accumulated commission to the administrator.
    pub fn withdraw_commission(&mut self, caller: &PublicKey) -> Result<Vec<Event>, TableError> {
        self.ensure_admin(caller)?;
        let amount = self.round.commission;
        if amount == 0 {
            return Err(ValidationError::NothingToWithdraw.into());
        }
        let held = self.treasury.held();
        if held < amount {
            return Err(AccountingError::InsufficientHeldBalance {
                needed: amount,
                held,
            }
            .into());
        }
        self.round.commission = 0;
        if let Err(err) = self.treasury.transfer(caller, amount) {
            self.round.commission = amount;
            return Err(AccountingError::TransferFailed(err).into());
        }
        info!(amount, "commission withdrawn");
        Ok(vec![Event::CommissionWithdrawn {
            to: caller.clone(),
            amount,
        }])
    }

    // --- Persistence ---

    /// Write the round, ledger and history into `state`.
    pub async fn persist<S: State>(&self, state: &mut S) -> anyhow::Result<()> {
        state
            .apply(vec![
                (Key::Round, Some(Value::Round(self.round.clone()))),
                (Key::Ledger, Some(Value::Ledger(self.ledger.stakes().to_vec()))),
                (Key::History, Some(Value::History(self.history.to_vec()))),
            ])
            .await
            .context("persist table")
    }

    /// Rebuild a table from `state`, re-validating the ledger against `config`.
    pub async fn restore<S: State>(
        config: TableConfig,
        treasury: T,
        state: &S,
    ) -> anyhow::Result<Self> {
        let round = match state.get(&Key::Round).await.context("load round")? {
            Some(Value::Round(round)) => round,
            Some(_) => bail!("unexpected value under round key"),
            None => bail!("no persisted round"),
        };
        let stakes = match state.get(&Key::Ledger).await.context("load ledger")? {
            Some(Value::Ledger(stakes)) => stakes,
            Some(_) => bail!("unexpected value under ledger key"),
            None => Vec::new(),
        };
        let entries = match state.get(&Key::History).await.context("load history")? {
            Some(Value::History(entries)) => entries,
            Some(_) => bail!("unexpected value under history key"),
            None => Vec::new(),
        };

        let ledger = BetLedger::restore(config.limits, stakes).context("restore ledger")?;
        if ledger.totals() != round.totals {
            bail!("ledger totals do not match round totals");
        }
        if round.phase == Phase::Ended && !ledger.is_empty() {
            bail!("ended round still holds stakes");
        }
        if round.phase == Phase::Dealing && round.pending.is_none() {
            bail!("dealing round has no outstanding request");
        }
        let scheduler = RoundScheduler::new(config.phases);
        Ok(Self {
            gateway: RandomnessGateway::new(config.provider.clone()),
            history: HistoryLog::from_entries(config.history_capacity, entries),
            scheduler,
            round,
            ledger,
            config,
            treasury,
        })
    }

    // --- Guards ---

    fn ensure_admin(&self, caller: &PublicKey) -> Result<(), AdminError> {
        if caller != &self.config.admin {
            return Err(AdminError::Unauthorized);
        }
        Ok(())
    }

    fn ensure_dealing(&self) -> Result<(), ProtocolError> {
        if self.round.phase != Phase::Dealing {
            return Err(ProtocolError::NotDealing {
                phase: self.round.phase,
            });
        }
        Ok(())
    }
}
