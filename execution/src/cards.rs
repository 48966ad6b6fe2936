//! Deck encoding and card extraction from random words.
//!
//! Cards are encoded as `0..=51`:
//! - suit = card / 13 (0..=3)
//! - rank = card % 13 + 1 (1..=13, Ace low)

use baccarat_types::table::RandomWord;
use commonware_cryptography::{sha256::Sha256, Hasher};

/// Total cards in a standard deck.
pub const CARDS_PER_DECK: u8 = 52;

/// Ranks per suit.
pub const RANKS_PER_SUIT: u8 = 13;

const LANE_LEN: usize = 8;

/// Lanes at or above this value are rejected so `lane % 52` stays uniform.
const ACCEPT_BELOW: u64 = u64::MAX - u64::MAX % CARDS_PER_DECK as u64;

/// Returns the 1-based rank (1..=13), where 1 is Ace and 13 is King.
pub fn card_rank_one_based(card: u8) -> u8 {
    card % RANKS_PER_SUIT + 1
}

/// Map a random word onto a card index without modulo bias.
///
/// The word is read as four big-endian lanes and the first lane inside the accepted
/// zone wins. If every lane is rejected the word is rehashed and the scan repeats.
pub fn draw_card(word: &RandomWord) -> u8 {
    let mut word = *word;
    loop {
        for lane in word.chunks_exact(LANE_LEN) {
            let mut bytes = [0u8; LANE_LEN];
            bytes.copy_from_slice(lane);
            let value = u64::from_be_bytes(bytes);
            if value < ACCEPT_BELOW {
                return (value % CARDS_PER_DECK as u64) as u8;
            }
        }
        word = Sha256::hash(&word).0;
    }
}

/// Rank (1..=13) dealt by a random word.
pub fn draw_rank(word: &RandomWord) -> u8 {
    card_rank_one_based(draw_card(word))
}
