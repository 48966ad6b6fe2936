//! Keys and values the engine persists.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};

use crate::table::{Round, RoundSummary, Stake, MAX_HISTORY_CAPACITY, MAX_LEDGER_STAKES};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Round,
    /// Live stakes in placement order.
    Ledger,
    /// History ring, oldest first.
    History,
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Key::Round => 0u8.write(writer),
            Key::Ledger => 1u8.write(writer),
            Key::History => 2u8.write(writer),
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Key::Round),
            1 => Ok(Key::Ledger),
            2 => Ok(Key::History),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        1
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Round(Round),
    Ledger(Vec<Stake>),
    History(Vec<RoundSummary>),
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Value::Round(round) => {
                0u8.write(writer);
                round.write(writer);
            }
            Value::Ledger(stakes) => {
                1u8.write(writer);
                stakes.write(writer);
            }
            Value::History(summaries) => {
                2u8.write(writer);
                summaries.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Value::Round(Round::read(reader)?)),
            1 => Ok(Value::Ledger(Vec::<Stake>::read_range(
                reader,
                0..=MAX_LEDGER_STAKES,
            )?)),
            2 => Ok(Value::History(Vec::<RoundSummary>::read_range(
                reader,
                0..=MAX_HISTORY_CAPACITY,
            )?)),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        1 + match self {
            Value::Round(round) => round.encode_size(),
            Value::Ledger(stakes) => stakes.encode_size(),
            Value::History(summaries) => summaries.encode_size(),
        }
    }
}
