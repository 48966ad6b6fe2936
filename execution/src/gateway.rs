//! Randomness request/fulfillment protocol.
//!
//! At most one request is outstanding per round. A fulfillment is accepted only if it
//! carries the outstanding token, answers the expected kind, has exactly the expected
//! number of words, and is signed by the configured provider. Validation never
//! mutates the round; [`RandomnessGateway::consume`] clears the request once the
//! caller has committed the dealt cards.

use baccarat_types::{
    request_namespace,
    table::{Fulfillment, PendingRequest, RequestKind, RequestToken, Round},
    NAMESPACE,
};
use commonware_codec::Write;
use commonware_cryptography::{ed25519::PublicKey, sha256::Sha256, Hasher};

use crate::{cards::draw_rank, error::ProtocolError};

#[derive(Clone, Debug)]
pub struct RandomnessGateway {
    provider: PublicKey,
    namespace: Vec<u8>,
}

impl RandomnessGateway {
    pub fn new(provider: PublicKey) -> Self {
        Self {
            provider,
            namespace: request_namespace(NAMESPACE),
        }
    }

    pub fn provider(&self) -> &PublicKey {
        &self.provider
    }

    /// Token for the `kind` request of `round_id`. Unique per (round, kind).
    pub fn token(&self, round_id: u64, kind: RequestKind) -> RequestToken {
        let mut hasher = Sha256::new();
        hasher.update(&self.namespace);
        hasher.update(&round_id.to_be_bytes());
        let mut tag = Vec::with_capacity(1);
        kind.write(&mut tag);
        hasher.update(&tag);
        hasher.finalize()
    }

    /// Record an outstanding request on `round`.
    pub fn request(
        &self,
        round: &mut Round,
        kind: RequestKind,
        now_ms: u64,
    ) -> Result<RequestToken, ProtocolError> {
        if round.pending.is_some() {
            return Err(ProtocolError::RequestOutstanding);
        }
        let token = self.token(round.round_id, kind);
        round.pending = Some(PendingRequest {
            token,
            kind,
            requested_at_ms: now_ms,
        });
        Ok(token)
    }

    pub fn request_initial(&self, round: &mut Round, now_ms: u64) -> Result<RequestToken, ProtocolError> {
        self.request(round, RequestKind::Initial, now_ms)
    }

    pub fn request_additional(
        &self,
        round: &mut Round,
        now_ms: u64,
    ) -> Result<RequestToken, ProtocolError> {
        self.request(round, RequestKind::Additional, now_ms)
    }

    /// Check `fulfillment` against the outstanding `kind` request and return the dealt
    /// ranks, one per word, in word order.
    pub fn validate(
        &self,
        round: &Round,
        kind: RequestKind,
        fulfillment: &Fulfillment,
    ) -> Result<Vec<u8>, ProtocolError> {
        let pending = round
            .pending
            .as_ref()
            .ok_or(ProtocolError::NoPendingRequest)?;
        if fulfillment.token != pending.token {
            return Err(ProtocolError::TokenMismatch {
                expected: pending.token,
                got: fulfillment.token,
            });
        }
        if pending.kind != kind {
            return Err(ProtocolError::WrongRequestKind {
                expected: pending.kind,
                got: kind,
            });
        }
        if fulfillment.words.len() != pending.expected_words() {
            return Err(ProtocolError::WrongWordCount {
                expected: pending.expected_words(),
                got: fulfillment.words.len(),
            });
        }
        if !fulfillment.verify(&self.provider) {
            return Err(ProtocolError::UnauthorizedProvider);
        }
        Ok(fulfillment.words.iter().map(draw_rank).collect())
    }

    /// Clear the outstanding request.
    pub fn consume(&self, round: &mut Round) -> Option<PendingRequest> {
        round.pending.take()
    }
}
