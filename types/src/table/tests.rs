use super::*;
use crate::storage::{Key, Value};
use commonware_codec::{Encode, EncodeSize, ReadExt, Write};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    sha256::Sha256,
    Hasher, Signer,
};
use commonware_math::algebra::Random;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn participant(seed: u64) -> PublicKey {
    let mut rng = StdRng::seed_from_u64(seed);
    PrivateKey::random(&mut rng).public_key()
}

fn dealt_round() -> Round {
    let mut round = Round::new(7, 30_000);
    round.phase = Phase::Dealing;
    round.pending = Some(PendingRequest {
        token: Sha256::hash(b"token"),
        kind: RequestKind::Additional,
        requested_at_ms: 31_000,
    });
    round.player = Hand::from_ranks(&[1, 2]).unwrap();
    round.banker = Hand::from_ranks(&[3, 4]).unwrap();
    round.totals = OutcomeTotals {
        player: 10,
        banker: 20,
        tie: 0,
    };
    round.commission = 5;
    round
}

#[test]
fn test_outcome_roundtrip() {
    for outcome in Outcome::ALL {
        let encoded = outcome.encode();
        let decoded = Outcome::read(&mut &encoded[..]).unwrap();
        assert_eq!(outcome, decoded);
    }
    assert!(Outcome::read(&mut &[3u8][..]).is_err());
}

#[test]
fn test_phase_rejects_unknown_value() {
    assert_eq!(Phase::read(&mut &[1u8][..]).unwrap(), Phase::Dealing);
    assert!(Phase::read(&mut &[9u8][..]).is_err());
}

#[test]
fn test_round_roundtrip() {
    let round = dealt_round();
    let encoded = round.encode();
    assert_eq!(encoded.len(), round.encode_size());
    let decoded = Round::read(&mut &encoded[..]).unwrap();
    assert_eq!(round, decoded);
}

#[test]
fn test_round_rejects_pending_outside_dealing() {
    let mut round = dealt_round();
    round.phase = Phase::Ended;
    let encoded = round.encode();
    assert!(matches!(
        Round::read(&mut &encoded[..]),
        Err(commonware_codec::Error::Invalid("Round", _))
    ));
}

#[test]
fn test_hand_push_recomputes_value() {
    let mut hand = Hand::new();
    assert_eq!(hand.push(7).unwrap(), 7);
    assert_eq!(hand.push(8).unwrap(), 5);
    assert_eq!(hand.push(13).unwrap(), 5);
    assert_eq!(hand.cards(), &[7, 8, 13]);
    assert_eq!(hand.push(1), Err(HandError::Full { max: MAX_HAND_CARDS }));
    assert_eq!(hand.len(), 3);
}

#[test]
fn test_hand_rejects_bad_rank() {
    let mut hand = Hand::new();
    assert!(matches!(hand.push(0), Err(HandError::InvalidRank { got: 0, .. })));
    assert!(matches!(hand.push(14), Err(HandError::InvalidRank { got: 14, .. })));
    assert!(hand.is_empty());
}

#[test]
fn test_face_cards_count_zero() {
    for rank in [10, 11, 12, 13] {
        assert_eq!(card_value(rank), 0);
    }
    assert_eq!(card_value(1), 1);
    assert_eq!(card_value(9), 9);
    // King + Queen
    assert_eq!(hand_value(&[13, 12]), 0);
    // 9 + 9 = 18 -> 8
    assert_eq!(Hand::from_ranks(&[9, 9]).unwrap().value(), 8);
}

#[test]
fn test_hand_decode_rejects_inconsistent_value() {
    let hand = Hand::from_ranks(&[4, 4]).unwrap();
    let mut encoded = hand.encode().to_vec();
    let last = encoded.len() - 1;
    encoded[last] = 9;
    assert!(matches!(
        Hand::read(&mut &encoded[..]),
        Err(commonware_codec::Error::Invalid("Hand", "value does not match cards"))
    ));
}

#[test]
fn test_hand_decode_rejects_four_cards() {
    let mut encoded: Vec<u8> = Vec::new();
    vec![1u8, 2, 3, 4].write(&mut encoded);
    0u8.write(&mut encoded);
    assert!(Hand::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_stake_roundtrip_and_zero_rejection() {
    let stake = Stake {
        participant: participant(1),
        amount: 250,
        outcome: Outcome::Banker,
    };
    let encoded = stake.encode();
    assert_eq!(Stake::read(&mut &encoded[..]).unwrap(), stake);

    let zero = Stake { amount: 0, ..stake };
    let encoded = zero.encode();
    assert!(Stake::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_summary_rejects_wrong_winner() {
    let summary = RoundSummary {
        round_id: 3,
        winner: Outcome::Player,
        player_value: 8,
        banker_value: 7,
        timestamp_ms: 99,
    };
    let encoded = summary.encode();
    assert_eq!(RoundSummary::read(&mut &encoded[..]).unwrap(), summary);

    let lie = RoundSummary {
        winner: Outcome::Banker,
        ..summary
    };
    let encoded = lie.encode();
    assert!(RoundSummary::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_fulfillment_signature() {
    let mut rng = StdRng::seed_from_u64(42);
    let provider = PrivateKey::random(&mut rng);
    let impostor = PrivateKey::random(&mut rng);
    let token = Sha256::hash(b"round-1-initial");
    let words = vec![[1u8; WORD_LEN], [2u8; WORD_LEN]];

    let fulfillment = Fulfillment::sign(&provider, token, words);
    assert!(fulfillment.verify(&provider.public_key()));
    assert!(!fulfillment.verify(&impostor.public_key()));

    let mut tampered = fulfillment.clone();
    tampered.words[1][0] ^= 0xff;
    assert!(!tampered.verify(&provider.public_key()));

    let encoded = fulfillment.encode();
    let decoded = Fulfillment::read(&mut &encoded[..]).unwrap();
    assert_eq!(decoded, fulfillment);
    assert!(decoded.verify(&provider.public_key()));
}

#[test]
fn test_fulfillment_rejects_too_many_words() {
    let mut rng = StdRng::seed_from_u64(7);
    let provider = PrivateKey::random(&mut rng);
    let words = vec![[0u8; WORD_LEN]; MAX_FULFILLMENT_WORDS + 1];
    let fulfillment = Fulfillment::sign(&provider, Sha256::hash(b"t"), words);
    let encoded = fulfillment.encode();
    assert!(Fulfillment::read(&mut &encoded[..]).is_err());
}

#[test]
fn test_storage_value_roundtrip() {
    let values = [
        Value::Round(dealt_round()),
        Value::Ledger(vec![
            Stake {
                participant: participant(1),
                amount: 1,
                outcome: Outcome::Player,
            },
            Stake {
                participant: participant(2),
                amount: 2,
                outcome: Outcome::Tie,
            },
        ]),
        Value::History(vec![RoundSummary {
            round_id: 1,
            winner: Outcome::Tie,
            player_value: 4,
            banker_value: 4,
            timestamp_ms: 10,
        }]),
    ];
    for value in values {
        let encoded = value.encode();
        assert_eq!(Value::read(&mut &encoded[..]).unwrap(), value);
    }
    for key in [Key::Round, Key::Ledger, Key::History] {
        let encoded = key.encode();
        assert_eq!(Key::read(&mut &encoded[..]).unwrap(), key);
    }
}

#[test]
fn test_decoders_do_not_panic_on_garbage() {
    let mut rng = StdRng::seed_from_u64(0x5eed_bacc);
    for _ in 0..1_000 {
        let len = rng.gen_range(0..=256);
        let mut blob = vec![0u8; len];
        rng.fill(&mut blob[..]);
        let _ = Round::read(&mut &blob[..]);
        let _ = Value::read(&mut &blob[..]);
        let _ = Fulfillment::read(&mut &blob[..]);
        let _ = Hand::read(&mut &blob[..]);
    }
}

proptest! {
    #[test]
    fn hand_value_in_range(ranks in proptest::collection::vec(MIN_RANK..=MAX_RANK, 2..=3)) {
        let hand = Hand::from_ranks(&ranks).unwrap();
        prop_assert!(hand.value() <= 9);
        let expected = ranks.iter().map(|r| (r % 10) as u32).sum::<u32>() % 10;
        prop_assert_eq!(hand.value() as u32, expected);
    }
}
