use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, ReadRangeExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    Signer, Verifier,
};

use super::{RequestToken, MAX_FULFILLMENT_WORDS, WORD_LEN};
use crate::{fulfillment_namespace, NAMESPACE};

/// Raw unpredictable value delivered by the randomness provider.
pub type RandomWord = [u8; WORD_LEN];

/// Inbound answer to a randomness request, signed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fulfillment {
    pub token: RequestToken,
    pub words: Vec<RandomWord>,
    pub signature: ed25519::Signature,
}

impl Fulfillment {
    fn payload(token: &RequestToken, words: &[RandomWord]) -> Vec<u8> {
        let mut payload = Vec::with_capacity(token.encode_size() + words.len() * WORD_LEN);
        token.write(&mut payload);
        for word in words {
            payload.extend_from_slice(word);
        }
        payload
    }

    pub fn sign(private: &ed25519::PrivateKey, token: RequestToken, words: Vec<RandomWord>) -> Self {
        let signature = private.sign(
            &fulfillment_namespace(NAMESPACE),
            &Self::payload(&token, &words),
        );
        Self {
            token,
            words,
            signature,
        }
    }

    /// Returns true if `provider` signed this token and word set.
    pub fn verify(&self, provider: &PublicKey) -> bool {
        provider.verify(
            &fulfillment_namespace(NAMESPACE),
            &Self::payload(&self.token, &self.words),
            &self.signature,
        )
    }
}

impl Write for Fulfillment {
    fn write(&self, writer: &mut impl BufMut) {
        self.token.write(writer);
        self.words.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Fulfillment {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let token = RequestToken::read(reader)?;
        let words = Vec::<RandomWord>::read_range(reader, 1..=MAX_FULFILLMENT_WORDS)?;
        let signature = ed25519::Signature::read(reader)?;
        Ok(Self {
            token,
            words,
            signature,
        })
    }
}

impl EncodeSize for Fulfillment {
    fn encode_size(&self) -> usize {
        self.token.encode_size() + self.words.encode_size() + self.signature.encode_size()
    }
}
