//! Translate contract call failures into [`AppError`]s, decoding the faucet's
//! custom errors from revert data where possible.

use alloy::hex;
use alloy::sol_types::{SolError, SolInterface};
use attractor_core::AppError;

use crate::abi::Faucet::{self, FaucetErrors};

/// Human-readable form of a decoded faucet error, e.g. `DeadlineIsTooFar()`.
pub fn describe(error: &FaucetErrors) -> String {
    match error {
        FaucetErrors::DeadlineIsTooFar(_) => Faucet::DeadlineIsTooFar::SIGNATURE.to_string(),
        FaucetErrors::OwnableUnauthorizedAccount(e) => {
            format!("OwnableUnauthorizedAccount({})", e.account)
        }
        FaucetErrors::OwnableInvalidOwner(e) => format!("OwnableInvalidOwner({})", e.owner),
    }
}

/// Build the error for a call that reverted with `data`.
///
/// Known custom errors are named; anything else is reported as raw hex.
pub fn revert_error(method: &'static str, data: &[u8]) -> AppError {
    let reason = match FaucetErrors::abi_decode(data) {
        Ok(decoded) => describe(&decoded),
        Err(_) if data.is_empty() => "empty revert data".to_string(),
        Err(_) => format!("unknown error {}", hex::encode_prefixed(data)),
    };
    AppError::Revert { method, reason }
}

/// Map a failed contract call or send.
pub fn call_error(method: &'static str, err: alloy::contract::Error) -> AppError {
    if let Some(data) = err.as_revert_data() {
        tracing::debug!(method, data = %data, "Call reverted");
        return revert_error(method, &data);
    }
    AppError::Rpc(format!("{method} failed: {err}"))
}
