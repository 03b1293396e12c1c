use std::path::Path;

use alloy::hex;
use attractor_core::AppError;
use serde::Deserialize;

/// Default location of the compiled faucet, relative to the Hardhat project root.
pub const FAUCET_ARTIFACT: &str = "artifacts/contracts/Faucet.sol/Faucet.json";

/// Default location of the compiled companion token.
pub const TOKEN_ARTIFACT: &str = "artifacts/contracts/AttractorToken.sol/AttractorToken.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: String,
    bytecode: String,
}

/// Creation bytecode of a compiled contract, read from a Hardhat artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub contract_name: String,
    pub bytecode: Vec<u8>,
}

impl Artifact {
    /// Parse a Hardhat artifact JSON document.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| AppError::Encode(format!("malformed artifact: {e}")))?;
        let bytecode = hex::decode(raw.bytecode.trim()).map_err(|e| {
            AppError::Encode(format!("{} bytecode is not hex: {e}", raw.contract_name))
        })?;
        if bytecode.is_empty() {
            return Err(AppError::Encode(format!(
                "{} has no creation bytecode (abstract contract or interface?)",
                raw.contract_name
            )));
        }
        Ok(Self {
            contract_name: raw.contract_name,
            bytecode,
        })
    }

    /// Read and parse an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read artifact {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Creation code followed by ABI-encoded constructor arguments.
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Vec<u8> {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code
    }
}
