use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;
use std::fmt;

/// The three results a participant can stake on.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Player = 0,
    Banker = 1,
    Tie = 2,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Player, Outcome::Banker, Outcome::Tie];

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Player => "PLAYER",
            Outcome::Banker => "BANKER",
            Outcome::Tie => "TIE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Outcome {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Player),
            1 => Ok(Outcome::Banker),
            2 => Ok(Outcome::Tie),
            _ => Err(()),
        }
    }
}

impl Write for Outcome {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Outcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Outcome::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for Outcome {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// A participant's wager for the current round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stake {
    pub participant: PublicKey,
    pub amount: u64,
    pub outcome: Outcome,
}

impl Write for Stake {
    fn write(&self, writer: &mut impl BufMut) {
        self.participant.write(writer);
        self.amount.write(writer);
        self.outcome.write(writer);
    }
}

impl Read for Stake {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let participant = PublicKey::read(reader)?;
        let amount = u64::read(reader)?;
        if amount == 0 {
            return Err(Error::Invalid("Stake", "zero amount"));
        }
        let outcome = Outcome::read(reader)?;
        Ok(Self {
            participant,
            amount,
            outcome,
        })
    }
}

impl EncodeSize for Stake {
    fn encode_size(&self) -> usize {
        self.participant.encode_size() + self.amount.encode_size() + self.outcome.encode_size()
    }
}

/// Per-outcome sum of live stake amounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutcomeTotals {
    pub player: u64,
    pub banker: u64,
    pub tie: u64,
}

impl OutcomeTotals {
    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Player => self.player,
            Outcome::Banker => self.banker,
            Outcome::Tie => self.tie,
        }
    }

    pub fn get_mut(&mut self, outcome: Outcome) -> &mut u64 {
        match outcome {
            Outcome::Player => &mut self.player,
            Outcome::Banker => &mut self.banker,
            Outcome::Tie => &mut self.tie,
        }
    }

    /// Sum across all outcomes (saturating).
    pub fn total(&self) -> u64 {
        self.player
            .saturating_add(self.banker)
            .saturating_add(self.tie)
    }

    pub fn is_empty(&self) -> bool {
        self.player == 0 && self.banker == 0 && self.tie == 0
    }
}

impl Write for OutcomeTotals {
    fn write(&self, writer: &mut impl BufMut) {
        self.player.write(writer);
        self.banker.write(writer);
        self.tie.write(writer);
    }
}

impl Read for OutcomeTotals {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            player: u64::read(reader)?,
            banker: u64::read(reader)?,
            tie: u64::read(reader)?,
        })
    }
}

impl EncodeSize for OutcomeTotals {
    fn encode_size(&self) -> usize {
        self.player.encode_size() + self.banker.encode_size() + self.tie.encode_size()
    }
}
