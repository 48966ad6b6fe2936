//! Baccarat table execution.
//!
//! This crate contains the round state machine ([`Table`]) and the pieces it is
//! built from: stake ledger, randomness gateway, hand evaluation and settlement.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution; every operation takes `now_ms`.
//! - Cards come only from verified provider fulfillments.
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Round lifecycle
//! ```rust,ignore
//! # #[cfg(feature = "mocks")]
//! # {
//! use baccarat_execution::{mocks::*, Table};
//! use baccarat_types::table::Outcome;
//!
//! let (_, admin) = create_account_keypair(0);
//! let provider = MockProvider::new(1);
//! let (_, alice) = create_account_keypair(2);
//!
//! let mut treasury = MemoryTreasury::new(10_000);
//! treasury.fund(&alice, 100);
//! let mut table = Table::new(table_config(&admin, &provider.public_key()), treasury, 0);
//!
//! table.place_stake(&alice, Outcome::Player, 100, 1_000)?;
//! table.close_betting_and_deal(&admin, 2_000)?;
//! let token = table.pending_request().unwrap().token;
//! table.on_initial_fulfillment(&provider.fulfill(token, &[9, 13, 3, 4]), 3_000)?;
//! assert_eq!(table.history()[0].winner, Outcome::Player);
//! # }
//! ```

pub mod cards;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod hand;
pub mod history;
pub mod ledger;
pub mod logging;
pub mod round_scheduler;
pub mod settlement;
pub mod state;
pub mod table;
pub mod treasury;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use config::{Config, ConfigError, StakeLimits, TableConfig};
pub use error::{AccountingError, AdminError, ProtocolError, TableError, ValidationError};
pub use events::Event;
pub use state::State;
pub use table::Table;
pub use treasury::{TransferError, Treasury};
