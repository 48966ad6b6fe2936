use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

use super::Outcome;

/// Immutable record of a completed round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_id: u64,
    pub winner: Outcome,
    pub player_value: u8,
    pub banker_value: u8,
    pub timestamp_ms: u64,
}

impl Write for RoundSummary {
    fn write(&self, writer: &mut impl BufMut) {
        self.round_id.write(writer);
        self.winner.write(writer);
        self.player_value.write(writer);
        self.banker_value.write(writer);
        self.timestamp_ms.write(writer);
    }
}

impl Read for RoundSummary {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let round_id = u64::read(reader)?;
        let winner = Outcome::read(reader)?;
        let player_value = u8::read(reader)?;
        let banker_value = u8::read(reader)?;
        if player_value > 9 || banker_value > 9 {
            return Err(Error::Invalid("RoundSummary", "hand value out of range"));
        }
        let expected = match player_value.cmp(&banker_value) {
            std::cmp::Ordering::Greater => Outcome::Player,
            std::cmp::Ordering::Less => Outcome::Banker,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        if winner != expected {
            return Err(Error::Invalid("RoundSummary", "winner does not match values"));
        }
        let timestamp_ms = u64::read(reader)?;
        Ok(Self {
            round_id,
            winner,
            player_value,
            banker_value,
            timestamp_ms,
        })
    }
}

impl EncodeSize for RoundSummary {
    fn encode_size(&self) -> usize {
        self.round_id.encode_size()
            + self.winner.encode_size()
            + self.player_value.encode_size()
            + self.banker_value.encode_size()
            + self.timestamp_ms.encode_size()
    }
}
