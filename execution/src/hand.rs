//! Hand evaluation and third-card rules.
//!
//! Everything here is pure: values in, decisions out. The dealing protocol in
//! [`crate::table`] decides *when* to ask; these functions decide *what* the rules say.

use baccarat_types::table::Outcome;

pub use baccarat_types::table::{card_value, hand_value};

/// A two-card total of 8 or 9 ends the deal for both sides.
pub fn is_natural(value: u8) -> bool {
    value >= 8
}

/// Player draws on 0-5, stands on 6-7.
pub fn player_draws(player: u8) -> bool {
    player <= 5
}

/// Whether the opening hands require a third-card round trip.
pub fn needs_third_card(player: u8, banker: u8) -> bool {
    if is_natural(player) || is_natural(banker) {
        return false;
    }
    if player_draws(player) {
        return true;
    }
    banker <= 5
}

/// Banker's tableau once the Player has drawn a third card with scoring value `player_third`.
pub fn banker_should_draw(banker: u8, player_third: u8) -> bool {
    match banker {
        0..=2 => true,
        3 => player_third != 8,
        4 => (2..=7).contains(&player_third),
        5 => (4..=7).contains(&player_third),
        6 => player_third == 6 || player_third == 7,
        _ => false,
    }
}

/// Banker draw decision for both branches.
///
/// When the Player stood (`player_third` is `None`) the Banker draws on any total of
/// 5 or less and the tableau is not consulted.
pub fn banker_draws(banker: u8, player_third: Option<u8>) -> bool {
    match player_third {
        Some(value) => banker_should_draw(banker, value),
        None => banker <= 5,
    }
}

/// Strictly higher total wins; equal totals tie.
pub fn winner(player: u8, banker: u8) -> Outcome {
    match player.cmp(&banker) {
        std::cmp::Ordering::Greater => Outcome::Player,
        std::cmp::Ordering::Less => Outcome::Banker,
        std::cmp::Ordering::Equal => Outcome::Tie,
    }
}
