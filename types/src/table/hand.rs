use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};
use thiserror::Error as ThisError;

use super::{MAX_HAND_CARDS, MAX_RANK, MIN_RANK};

/// Scoring value of a card rank. Ace counts 1, 2-9 count face value, 10/J/Q/K count 0.
pub fn card_value(rank: u8) -> u8 {
    rank % 10
}

/// Hand total: sum of card values, modulo 10.
pub fn hand_value(ranks: &[u8]) -> u8 {
    (ranks.iter().map(|&rank| card_value(rank) as u16).sum::<u16>() % 10) as u8
}

#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum HandError {
    #[error("hand is full (max={max})")]
    Full { max: usize },
    #[error("card rank out of range (got={got}, min={min}, max={max})")]
    InvalidRank { got: u8, min: u8, max: u8 },
}

fn check_rank(rank: u8) -> Result<(), HandError> {
    if !(MIN_RANK..=MAX_RANK).contains(&rank) {
        return Err(HandError::InvalidRank {
            got: rank,
            min: MIN_RANK,
            max: MAX_RANK,
        });
    }
    Ok(())
}

/// Cards held by the Player or Banker side.
///
/// The value is recomputed on every card addition so it can never drift from the
/// cards it summarizes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<u8>,
    value: u8,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranks(ranks: &[u8]) -> Result<Self, HandError> {
        let mut hand = Self::new();
        for &rank in ranks {
            hand.push(rank)?;
        }
        Ok(hand)
    }

    /// Add a card and return the new hand value.
    pub fn push(&mut self, rank: u8) -> Result<u8, HandError> {
        if self.cards.len() >= MAX_HAND_CARDS {
            return Err(HandError::Full {
                max: MAX_HAND_CARDS,
            });
        }
        check_rank(rank)?;
        self.cards.push(rank);
        self.value = hand_value(&self.cards);
        Ok(self.value)
    }

    pub fn cards(&self) -> &[u8] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.value = 0;
    }
}

impl Write for Hand {
    fn write(&self, writer: &mut impl BufMut) {
        self.cards.write(writer);
        self.value.write(writer);
    }
}

impl Read for Hand {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let cards = Vec::<u8>::read_range(reader, 0..=MAX_HAND_CARDS)?;
        if cards.iter().any(|&rank| check_rank(rank).is_err()) {
            return Err(Error::Invalid("Hand", "card rank out of range"));
        }
        let value = u8::read(reader)?;
        if value != hand_value(&cards) {
            return Err(Error::Invalid("Hand", "value does not match cards"));
        }
        Ok(Self { cards, value })
    }
}

impl EncodeSize for Hand {
    fn encode_size(&self) -> usize {
        self.cards.encode_size() + self.value.encode_size()
    }
}
