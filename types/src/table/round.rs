use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::sha256::Digest;

use super::{Hand, OutcomeTotals, ADDITIONAL_WORDS, INITIAL_WORDS};

/// Opaque correlation token for an outstanding randomness request.
pub type RequestToken = Digest;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Betting = 0,
    Dealing = 1,
    Ended = 2,
}

impl TryFrom<u8> for Phase {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Phase::Betting),
            1 => Ok(Phase::Dealing),
            2 => Ok(Phase::Ended),
            _ => Err(()),
        }
    }
}

impl Write for Phase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Phase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        Phase::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for Phase {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// Which leg of the dealing protocol a request serves.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Two cards each for Player and Banker.
    Initial = 0,
    /// One third-card slot per side.
    Additional = 1,
}

impl RequestKind {
    pub fn expected_words(&self) -> usize {
        match self {
            RequestKind::Initial => INITIAL_WORDS,
            RequestKind::Additional => ADDITIONAL_WORDS,
        }
    }
}

impl TryFrom<u8> for RequestKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RequestKind::Initial),
            1 => Ok(RequestKind::Additional),
            _ => Err(()),
        }
    }
}

impl Write for RequestKind {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for RequestKind {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        RequestKind::try_from(value).map_err(|_| Error::InvalidEnum(value))
    }
}

impl EncodeSize for RequestKind {
    fn encode_size(&self) -> usize {
        u8::SIZE
    }
}

/// An issued randomness request awaiting its fulfillment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub kind: RequestKind,
    pub requested_at_ms: u64,
}

impl PendingRequest {
    pub fn expected_words(&self) -> usize {
        self.kind.expected_words()
    }
}

impl Write for PendingRequest {
    fn write(&self, writer: &mut impl BufMut) {
        self.token.write(writer);
        self.kind.write(writer);
        self.requested_at_ms.write(writer);
    }
}

impl Read for PendingRequest {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            token: RequestToken::read(reader)?,
            kind: RequestKind::read(reader)?,
            requested_at_ms: u64::read(reader)?,
        })
    }
}

impl EncodeSize for PendingRequest {
    fn encode_size(&self) -> usize {
        self.token.encode_size() + self.kind.encode_size() + self.requested_at_ms.encode_size()
    }
}

/// The single live round of the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub round_id: u64,
    pub phase: Phase,
    pub betting_ends_at_ms: u64,
    /// At most one request is ever outstanding.
    pub pending: Option<PendingRequest>,
    pub player: Hand,
    pub banker: Hand,
    pub totals: OutcomeTotals,
    /// Commission withheld from Banker wins and not yet withdrawn. Carries across rounds.
    pub commission: u64,
    pub paused: bool,
}

impl Round {
    pub fn new(round_id: u64, betting_ends_at_ms: u64) -> Self {
        Self {
            round_id,
            phase: Phase::Betting,
            betting_ends_at_ms,
            pending: None,
            player: Hand::new(),
            banker: Hand::new(),
            totals: OutcomeTotals::default(),
            commission: 0,
            paused: false,
        }
    }
}

impl Write for Round {
    fn write(&self, writer: &mut impl BufMut) {
        self.round_id.write(writer);
        self.phase.write(writer);
        self.betting_ends_at_ms.write(writer);
        match &self.pending {
            Some(pending) => {
                true.write(writer);
                pending.write(writer);
            }
            None => false.write(writer),
        }
        self.player.write(writer);
        self.banker.write(writer);
        self.totals.write(writer);
        self.commission.write(writer);
        self.paused.write(writer);
    }
}

impl Read for Round {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let round_id = u64::read(reader)?;
        let phase = Phase::read(reader)?;
        let betting_ends_at_ms = u64::read(reader)?;
        let pending = if bool::read(reader)? {
            Some(PendingRequest::read(reader)?)
        } else {
            None
        };
        if pending.is_some() && phase != Phase::Dealing {
            return Err(Error::Invalid("Round", "pending request outside dealing"));
        }
        let player = Hand::read(reader)?;
        let banker = Hand::read(reader)?;
        let totals = OutcomeTotals::read(reader)?;
        let commission = u64::read(reader)?;
        let paused = bool::read(reader)?;

        Ok(Self {
            round_id,
            phase,
            betting_ends_at_ms,
            pending,
            player,
            banker,
            totals,
            commission,
            paused,
        })
    }
}

impl EncodeSize for Round {
    fn encode_size(&self) -> usize {
        self.round_id.encode_size()
            + self.phase.encode_size()
            + self.betting_ends_at_ms.encode_size()
            + bool::SIZE
            + self.pending.as_ref().map_or(0, |pending| pending.encode_size())
            + self.player.encode_size()
            + self.banker.encode_size()
            + self.totals.encode_size()
            + self.commission.encode_size()
            + self.paused.encode_size()
    }
}
