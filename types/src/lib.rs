//! Common types shared by the baccarat table engine and its collaborators.
//!
//! [`table`] holds the round aggregate and everything persisted or sent over the
//! randomness provider boundary. [`storage`] holds the keys and values the engine
//! writes to its backing state.

pub mod storage;
pub mod table;

use commonware_utils::union;

/// Namespace used for every signature and request token produced for this table.
pub const NAMESPACE: &[u8] = b"_BACCARAT";
pub const FULFILLMENT_SUFFIX: &[u8] = b"_FULFILL";
pub const REQUEST_SUFFIX: &[u8] = b"_REQUEST";

#[inline]
pub fn fulfillment_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, FULFILLMENT_SUFFIX)
}

#[inline]
pub fn request_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, REQUEST_SUFFIX)
}
