//! Round timing for the table.
//!
//! The scheduler owns no state of its own: it turns configured durations and a
//! caller-supplied `now_ms` into deadlines and phase checks, so the same inputs
//! always give the same answers.
//!
//! ## Phases
//!
//! A round progresses through three phases:
//! 1. **Betting** - stakes accepted until the deadline
//! 2. **Dealing** - randomness requested, cards dealt, third-card round trip if needed
//! 3. **Ended** - outcome settled, waiting for the next round to be opened

use baccarat_types::table::{PendingRequest, Phase};

/// Phase configuration with durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseConfig {
    /// Duration of the betting window.
    pub betting_ms: u64,
    /// How long an outstanding randomness request may go unanswered before the deal
    /// can be expired.
    pub fulfillment_timeout_ms: u64,
}

impl PhaseConfig {
    pub fn new(betting_ms: u64, fulfillment_timeout_ms: u64) -> Self {
        Self {
            betting_ms,
            fulfillment_timeout_ms,
        }
    }

    /// Validate the configuration (all durations must be > 0).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.betting_ms == 0 {
            return Err("betting_ms must be greater than zero");
        }
        if self.fulfillment_timeout_ms == 0 {
            return Err("fulfillment_timeout_ms must be greater than zero");
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RoundScheduler {
    config: PhaseConfig,
}

impl RoundScheduler {
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Betting deadline for a window opened at `start_ms`.
    pub fn betting_deadline(&self, start_ms: u64) -> u64 {
        start_ms.saturating_add(self.config.betting_ms)
    }

    /// Stakes are accepted strictly before the deadline.
    pub fn is_betting_open(phase: Phase, deadline_ms: u64, now_ms: u64) -> bool {
        phase == Phase::Betting && now_ms < deadline_ms
    }

    pub fn can_start_new_round(phase: Phase) -> bool {
        phase == Phase::Ended
    }

    /// Instant from which an outstanding request counts as stalled.
    pub fn stall_deadline(&self, pending: &PendingRequest) -> u64 {
        pending
            .requested_at_ms
            .saturating_add(self.config.fulfillment_timeout_ms)
    }

    pub fn is_stalled(&self, phase: Phase, pending: Option<&PendingRequest>, now_ms: u64) -> bool {
        match pending {
            Some(pending) if phase == Phase::Dealing => now_ms >= self.stall_deadline(pending),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baccarat_types::table::RequestKind;
    use commonware_cryptography::{sha256::Sha256, Hasher};

    fn test_config() -> PhaseConfig {
        PhaseConfig::new(30_000, 60_000)
    }

    fn pending(requested_at_ms: u64) -> PendingRequest {
        PendingRequest {
            token: Sha256::hash(b"pending"),
            kind: RequestKind::Initial,
            requested_at_ms,
        }
    }

    #[test]
    fn test_phase_config_validation() {
        assert!(test_config().validate().is_ok());
        assert_eq!(
            PhaseConfig::new(0, 1).validate(),
            Err("betting_ms must be greater than zero")
        );
        assert_eq!(
            PhaseConfig::new(1, 0).validate(),
            Err("fulfillment_timeout_ms must be greater than zero")
        );
    }

    #[test]
    fn test_betting_window() {
        let scheduler = RoundScheduler::new(test_config());
        let deadline = scheduler.betting_deadline(1_000);
        assert_eq!(deadline, 31_000);
        assert!(RoundScheduler::is_betting_open(Phase::Betting, deadline, 30_999));
        assert!(!RoundScheduler::is_betting_open(Phase::Betting, deadline, 31_000));
        assert!(!RoundScheduler::is_betting_open(Phase::Dealing, deadline, 0));
    }

    #[test]
    fn test_deadline_saturates() {
        let scheduler = RoundScheduler::new(test_config());
        assert_eq!(scheduler.betting_deadline(u64::MAX - 1), u64::MAX);
        assert_eq!(scheduler.stall_deadline(&pending(u64::MAX)), u64::MAX);
    }

    #[test]
    fn test_is_stalled() {
        let scheduler = RoundScheduler::new(test_config());
        let request = pending(5_000);
        assert!(!scheduler.is_stalled(Phase::Dealing, Some(&request), 64_999));
        assert!(scheduler.is_stalled(Phase::Dealing, Some(&request), 65_000));
        assert!(!scheduler.is_stalled(Phase::Dealing, None, 1_000_000));
        assert!(!scheduler.is_stalled(Phase::Ended, Some(&request), 1_000_000));
    }

    #[test]
    fn test_can_start_new_round() {
        assert!(RoundScheduler::can_start_new_round(Phase::Ended));
        assert!(!RoundScheduler::can_start_new_round(Phase::Betting));
        assert!(!RoundScheduler::can_start_new_round(Phase::Dealing));
    }
}
