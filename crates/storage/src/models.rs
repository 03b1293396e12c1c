use serde::{Deserialize, Serialize};

// ─── Deployment Record ──────────────────────────────────────────────────────

/// Everything needed to operate a freshly deployed faucet.
///
/// Addresses are stored checksummed and the portion as a decimal string so
/// the document stays readable by any JSON tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub faucet: FaucetRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetRecord {
    pub network: NetworkRecord,
    pub address: String,
    pub token: String,
    pub portion: String,
    pub deployer: String,
    pub owner: String,
    pub signer: SignerRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub name: String,
    pub chain_id: u64,
}

// ─── Trusted Signer ─────────────────────────────────────────────────────────

/// The generated trusted-signer keypair. Sole copy of the private key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerRecord {
    pub address: String,
    pub private_key: String,
}

impl std::fmt::Debug for SignerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerRecord")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
