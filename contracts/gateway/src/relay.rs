//! # Relayed call validation
//!
//! A relayed call carries a secp256k1 signature over
//!
//! ```text
//! inner  = keccak256(XDR(signed_for) ‖ XDR(operation) ‖ nonce as u64 big-endian)
//! digest = keccak256("\x19Ethereum Signed Message:\n32" ‖ inner)
//! ```
//!
//! The signer is identified by the Ethereum-style address of its public key,
//! so off-chain tooling that signs personal messages can produce signatures
//! directly. Nonces are per signer, start at 0 and advance by exactly one on
//! every accepted submission.

use gatekeeper_common::{Controller, Operation};
use soroban_sdk::{crypto::Hash, xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::{DataKey, GatewayError};

pub const SIGNED_MESSAGE_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

/// Order `n` of the secp256k1 group, big-endian.
const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// `n / 2`, the largest `s` the host accepts.
const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

pub fn message_digest(
    env: &Env,
    signed_for: &Address,
    operation: &Operation,
    nonce: u64,
) -> Hash<32> {
    let mut message = signed_for.clone().to_xdr(env);
    message.append(&operation.clone().to_xdr(env));
    message.extend_from_array(&nonce.to_be_bytes());
    let inner = env.crypto().keccak256(&message);

    let mut prefixed = Bytes::from_array(env, SIGNED_MESSAGE_PREFIX);
    prefixed.extend_from_array(&inner.to_array());
    env.crypto().keccak256(&prefixed)
}

/// `0 < r < n` and `0 < s <= n/2`. Big-endian arrays compare numerically.
fn is_canonical(r: &[u8; 32], s: &[u8; 32]) -> bool {
    let zero = [0u8; 32];
    *r != zero && *r < CURVE_ORDER && *s != zero && *s <= HALF_CURVE_ORDER
}

/// Recovers the key id that produced `signature` over `digest`.
///
/// `signature` is `r ‖ s ‖ v` with `v` in `{0, 1, 27, 28}` and a low `s`.
/// Out-of-range scalars are rejected before they reach the host.
pub fn recover_signer(
    env: &Env,
    digest: &Hash<32>,
    signature: &BytesN<65>,
) -> Result<BytesN<20>, GatewayError> {
    let raw = signature.to_array();
    let recovery_id = match raw[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return Err(GatewayError::SignatureMismatch),
    };

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&raw[..32]);
    s.copy_from_slice(&raw[32..64]);
    if !is_canonical(&r, &s) {
        return Err(GatewayError::SignatureMismatch);
    }

    let mut rs = [0u8; 64];
    rs.copy_from_slice(&raw[..64]);
    let public_key = env.crypto().secp256k1_recover(
        digest,
        &BytesN::from_array(env, &rs),
        recovery_id as u32,
    );
    Ok(Controller::from_public_key(env, &public_key).key_id(env))
}

/// Checks the call is bound to this gateway and signed by `signer`.
pub fn verify(
    env: &Env,
    signed_for: &Address,
    signer: &BytesN<20>,
    operation: &Operation,
    nonce: u64,
    signature: &BytesN<65>,
) -> Result<BytesN<20>, GatewayError> {
    if *signed_for != env.current_contract_address() {
        return Err(GatewayError::WrongTarget);
    }

    let digest = message_digest(env, signed_for, operation, nonce);
    let recovered = recover_signer(env, &digest, signature)?;
    if recovered != *signer {
        return Err(GatewayError::SignatureMismatch);
    }
    Ok(recovered)
}

pub fn nonce(env: &Env, signer: &BytesN<20>) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::Nonce(signer.clone()))
        .unwrap_or(0)
}

pub fn check_and_consume_nonce(
    env: &Env,
    signer: &BytesN<20>,
    nonce: u64,
) -> Result<(), GatewayError> {
    let current = self::nonce(env, signer);
    if nonce != current {
        return Err(GatewayError::IncorrectNonce);
    }
    env.storage()
        .persistent()
        .set(&DataKey::Nonce(signer.clone()), &(current + 1));
    Ok(())
}
