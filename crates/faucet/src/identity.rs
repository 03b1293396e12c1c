//! Identity tags: the 32-byte name the faucet keys dispenses by.

use alloy::primitives::{B256, keccak256};

/// Hash an external identity (e.g. a remote IP address) into an identity tag.
///
/// Equivalent to Solidity's `keccak256(abi.encodePacked(identity))`: the
/// packed encoding of a `string` is its raw UTF-8 bytes.
pub fn hash_identity(identity: &str) -> B256 {
    keccak256(identity.as_bytes())
}
