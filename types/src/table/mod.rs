//! Baccarat table domain types.
//!
//! Defines the round aggregate, stakes, hands, history summaries and the randomness
//! fulfillment wire format used by the execution crate and the provider relay.

mod constants;
mod fulfillment;
mod hand;
mod round;
mod stake;
mod summary;

pub use constants::*;
pub use fulfillment::*;
pub use hand::*;
pub use round::*;
pub use stake::*;
pub use summary::*;

#[cfg(test)]
mod tests;
