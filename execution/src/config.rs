//! Table configuration.
//!
//! [`Config`] is the raw, deserializable form (hex-encoded keys, plain integers).
//! [`Config::validate`] turns it into a [`TableConfig`] or explains what is wrong.

use baccarat_types::table::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use commonware_codec::DecodeExt;
use commonware_cryptography::ed25519::PublicKey;
use commonware_utils::from_hex_formatted;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::round_scheduler::PhaseConfig;
use crate::settlement::MAX_PAYOUT_MULTIPLIER;

const DEFAULT_FULFILLMENT_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid {field} key: {value}")]
    InvalidKey { field: &'static str, value: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("min_stake ({min}) exceeds max_stake ({max})")]
    InvalidRange { min: u64, max: u64 },
    #[error("max_stake ({max_stake}) times the tie multiplier overflows")]
    PayoutOverflow { max_stake: u64 },
    #[error("max_outcome_total ({cap}) is below max_stake ({max_stake})")]
    CapBelowMaxStake { cap: u64, max_stake: u64 },
    #[error("history_capacity must be in 1..={max} (got {got})")]
    HistoryCapacity { got: usize, max: usize },
    #[error("invalid phase timing: {0}")]
    Phase(&'static str),
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_fulfillment_timeout_ms() -> u64 {
    DEFAULT_FULFILLMENT_TIMEOUT_MS
}

/// Configuration as read from disk.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Hex-encoded ed25519 public key of the administrator.
    pub admin: String,
    /// Hex-encoded ed25519 public key of the randomness provider.
    pub provider: String,
    pub min_stake: u64,
    pub max_stake: u64,
    /// Cap on the aggregate staked on any one outcome per round.
    pub max_outcome_total: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    pub betting_ms: u64,
    #[serde(default = "default_fulfillment_timeout_ms")]
    pub fulfillment_timeout_ms: u64,
}

/// Per-stake and per-outcome bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeLimits {
    pub min_stake: u64,
    pub max_stake: u64,
    pub max_outcome_total: u64,
}

impl StakeLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_stake == 0 {
            return Err(ConfigError::Zero { field: "min_stake" });
        }
        if self.min_stake > self.max_stake {
            return Err(ConfigError::InvalidRange {
                min: self.min_stake,
                max: self.max_stake,
            });
        }
        if self.max_stake.checked_mul(MAX_PAYOUT_MULTIPLIER).is_none() {
            return Err(ConfigError::PayoutOverflow {
                max_stake: self.max_stake,
            });
        }
        if self.max_outcome_total < self.max_stake {
            return Err(ConfigError::CapBelowMaxStake {
                cap: self.max_outcome_total,
                max_stake: self.max_stake,
            });
        }
        Ok(())
    }
}

/// Validated table configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableConfig {
    pub admin: PublicKey,
    pub provider: PublicKey,
    pub limits: StakeLimits,
    pub history_capacity: usize,
    pub phases: PhaseConfig,
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryCapacity {
                got: self.history_capacity,
                max: MAX_HISTORY_CAPACITY,
            });
        }
        self.phases.validate().map_err(ConfigError::Phase)
    }
}

fn parse_public_key(field: &'static str, value: &str) -> Result<PublicKey, ConfigError> {
    from_hex_formatted(value)
        .and_then(|raw| PublicKey::decode(raw.as_ref()).ok())
        .ok_or_else(|| ConfigError::InvalidKey {
            field,
            value: value.to_string(),
        })
}

impl Config {
    pub fn from_yaml(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn validate(self) -> Result<TableConfig, ConfigError> {
        let config = TableConfig {
            admin: parse_public_key("admin", &self.admin)?,
            provider: parse_public_key("provider", &self.provider)?,
            limits: StakeLimits {
                min_stake: self.min_stake,
                max_stake: self.max_stake,
                max_outcome_total: self.max_outcome_total,
            },
            history_capacity: self.history_capacity,
            phases: PhaseConfig::new(self.betting_ms, self.fulfillment_timeout_ms),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::create_account_keypair;
    use commonware_codec::Encode;
    use commonware_utils::hex;

    fn yaml(admin: &PublicKey, provider: &PublicKey, extra: &str) -> String {
        format!(
            "admin: \"{}\"\nprovider: \"{}\"\nmin_stake: 10\nmax_stake: 1000\nmax_outcome_total: 5000\nbetting_ms: 30000\n{}",
            hex(&admin.encode()),
            hex(&provider.encode()),
            extra
        )
    }

    #[test]
    fn test_parse_and_validate() {
        let (_, admin) = create_account_keypair(1);
        let (_, provider) = create_account_keypair(2);
        let config = Config::from_yaml(&yaml(&admin, &provider, ""))
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.admin, admin);
        assert_eq!(config.provider, provider);
        assert_eq!(config.limits.min_stake, 10);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(
            config.phases.fulfillment_timeout_ms,
            DEFAULT_FULFILLMENT_TIMEOUT_MS
        );
    }

    #[test]
    fn test_rejects_bad_key() {
        let (_, admin) = create_account_keypair(1);
        let input = yaml(&admin, &admin, "").replacen(&hex(&admin.encode()), "zz", 1);
        let err = Config::from_yaml(&input).unwrap().validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey { field: "admin", .. }));
    }

    #[test]
    fn test_rejects_bad_limits() {
        let (_, admin) = create_account_keypair(1);
        let base = Config::from_yaml(&yaml(&admin, &admin, "")).unwrap();

        let inverted = Config {
            min_stake: 2_000,
            ..base.clone()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidRange { .. })
        ));

        let overflow = Config {
            max_stake: u64::MAX / 2,
            max_outcome_total: u64::MAX,
            ..base.clone()
        };
        assert!(matches!(
            overflow.validate(),
            Err(ConfigError::PayoutOverflow { .. })
        ));

        let low_cap = Config {
            max_outcome_total: 999,
            ..base.clone()
        };
        assert!(matches!(
            low_cap.validate(),
            Err(ConfigError::CapBelowMaxStake { .. })
        ));

        let no_history = Config {
            history_capacity: 0,
            ..base.clone()
        };
        assert!(matches!(
            no_history.validate(),
            Err(ConfigError::HistoryCapacity { .. })
        ));

        let no_window = Config {
            betting_ms: 0,
            ..base
        };
        assert!(matches!(no_window.validate(), Err(ConfigError::Phase(_))));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(matches!(
            Config::from_yaml("admin: [unterminated"),
            Err(ConfigError::Parse(_))
        ));
    }
}
