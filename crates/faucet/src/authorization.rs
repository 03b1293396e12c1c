//! Off-chain dispense authorization.
//!
//! Provides functions for:
//! - Computing the message digest the faucet verifies ([`authorization_digest`])
//! - Signing it with the trusted signer key ([`authorize`])
//! - Recovering the signer of an authorization ([`recover_signer`])
//! - Fixing a deadline relative to the current time ([`deadline_from_now`])

use std::time::Duration;

use alloy::primitives::{Address, B256, Signature, U256, keccak256};
use alloy::signers::SignerSync;
use alloy::sol_types::SolValue;
use attractor_core::AppError;

use crate::abi::Faucet;

/// Domain-separation prefix of every dispense authorization message.
pub const AUTHORIZATION_PREFIX: &str = "Attractor faucet dispension! Our lucky guy is";

/// secp256k1 curve order N / 2. Signatures with s > this are malleable (EIP-2).
const SECP256K1_N_DIV_2: U256 = U256::from_limbs([
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
]);

/// Recipient of a dispense and its identity tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub addr: Address,
    pub name: B256,
}

impl Actor {
    pub fn new(addr: Address, name: B256) -> Self {
        Self { addr, name }
    }
}

impl From<Actor> for Faucet::Actor {
    fn from(actor: Actor) -> Self {
        Faucet::Actor {
            addr: actor.addr,
            name: actor.name,
        }
    }
}

/// ECDSA signature split into the components the contract takes.
///
/// `v` is in Electrum notation (27 or 28).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl From<Signature> for AuthSignature {
    fn from(sig: Signature) -> Self {
        Self {
            v: 27 + u8::from(sig.v()),
            r: B256::from(sig.r().to_be_bytes::<32>()),
            s: B256::from(sig.s().to_be_bytes::<32>()),
        }
    }
}

impl TryFrom<AuthSignature> for Signature {
    type Error = AppError;

    fn try_from(sig: AuthSignature) -> Result<Self, Self::Error> {
        let parity = match sig.v {
            27 => false,
            28 => true,
            v => return Err(AppError::Signing(format!("invalid recovery id v={v}"))),
        };
        Ok(Signature::new(
            U256::from_be_bytes(sig.r.0),
            U256::from_be_bytes(sig.s.0),
            parity,
        ))
    }
}

impl From<AuthSignature> for Faucet::Signature {
    fn from(sig: AuthSignature) -> Self {
        Faucet::Signature {
            v: sig.v,
            r: sig.r,
            s: sig.s,
        }
    }
}

/// Compute the digest a dispense authorization signs.
///
/// `keccak256(abi.encodePacked(PREFIX, actor.addr, actor.name, faucet, uint64(deadline)))`.
/// The layout binds the signature to one recipient, identity, faucet and deadline.
pub fn authorization_digest(actor: &Actor, faucet: Address, deadline: u64) -> B256 {
    let packed = (AUTHORIZATION_PREFIX, actor.addr, actor.name, faucet, deadline).abi_encode_packed();
    keccak256(packed)
}

/// Sign a dispense authorization with the trusted signer key.
///
/// The digest is signed as an EIP-191 personal message (`"\x19Ethereum Signed
/// Message:\n32" ‖ digest`), which is what the contract recovers against.
/// Whether `signer` is actually trusted is only known once the faucet verifies it.
pub fn authorize<S>(
    actor: &Actor,
    faucet: Address,
    deadline: u64,
    signer: &S,
) -> Result<AuthSignature, AppError>
where
    S: SignerSync + ?Sized,
{
    let digest = authorization_digest(actor, faucet, deadline);
    let sig = signer
        .sign_message_sync(digest.as_slice())
        .map_err(|e| AppError::Signing(format!("authorization signing failed: {e}")))?;
    Ok(sig.into())
}

/// Recover the address that signed an authorization for the given tuple.
/// Rejects high-s signatures to prevent malleability (EIP-2).
pub fn recover_signer(
    actor: &Actor,
    faucet: Address,
    deadline: u64,
    signature: &AuthSignature,
) -> Result<Address, AppError> {
    let sig = Signature::try_from(*signature)?;
    if sig.s() > SECP256K1_N_DIV_2 {
        return Err(AppError::Signing(
            "high-s signature rejected (EIP-2 malleability)".to_string(),
        ));
    }

    let digest = authorization_digest(actor, faucet, deadline);
    sig.recover_address_from_msg(digest.as_slice())
        .map_err(|e| AppError::Signing(format!("recovery failed: {e}")))
}

/// Deadline `window` after `now` (Unix seconds). Fails if it does not fit a `uint64`.
pub fn deadline_from_now(now: u64, window: Duration) -> Result<u64, AppError> {
    now.checked_add(window.as_secs()).ok_or_else(|| {
        AppError::Encode(format!(
            "deadline {now} + {}s does not fit uint64",
            window.as_secs()
        ))
    })
}
