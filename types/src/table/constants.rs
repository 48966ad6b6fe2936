/// Maximum cards a Baccarat hand can hold.
pub const MAX_HAND_CARDS: usize = 3;

/// Lowest card rank (Ace).
pub const MIN_RANK: u8 = 1;

/// Highest card rank (King).
pub const MAX_RANK: u8 = 13;

/// Words requested for the opening deal (two cards per hand).
pub const INITIAL_WORDS: usize = 4;

/// Words requested for third cards (Player slot, then Banker slot).
pub const ADDITIONAL_WORDS: usize = 2;

/// Largest word vector a fulfillment may carry.
pub const MAX_FULFILLMENT_WORDS: usize = INITIAL_WORDS;

/// Length of a raw random word in bytes.
pub const WORD_LEN: usize = 32;

/// Default number of round summaries kept in history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Upper bound on history capacity accepted from configuration or storage.
pub const MAX_HISTORY_CAPACITY: usize = 64;

/// Upper bound on the number of stakes a persisted ledger may hold.
pub const MAX_LEDGER_STAKES: usize = 4_096;
