use std::fmt::Write;

use baccarat_types::table::Hand;

pub fn format_card_list(cards: &[u8]) -> String {
    let mut out = String::with_capacity(cards.len().saturating_mul(3));
    for (idx, card) in cards.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", card);
    }
    out
}

/// `ranks=value`, e.g. `1,2,5=8`.
pub fn format_hand(hand: &Hand) -> String {
    let mut out = format_card_list(hand.cards());
    let _ = write!(out, "={}", hand.value());
    out
}
