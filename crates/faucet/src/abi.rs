use alloy::sol;

// ─── Faucet ─────────────────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract Faucet {
        /// Recipient of a dispense plus the hash of its external identity.
        struct Actor {
            address addr;
            bytes32 name;
        }

        /// Split ECDSA signature as accepted by `ecrecover`.
        struct Signature {
            uint8 v;
            bytes32 r;
            bytes32 s;
        }

        // === Custom errors ===
        error DeadlineIsTooFar();

        // OpenZeppelin v5 Ownable
        error OwnableUnauthorizedAccount(address account);
        error OwnableInvalidOwner(address owner);

        constructor(address signer, address token, uint256 portion);

        // === Views ===
        function token() external view returns (address);
        function portion() external view returns (uint256);
        function owner() external view returns (address);
        function signer() external view returns (address);

        // === Owner operations ===
        function trust(address signer) external;
        function transferOwnership(address newOwner) external;
        function flush() external;

        // === Public entry point ===
        function dispense(Actor calldata actor, Signature calldata signature, uint64 deadline) external;
    }
}

// ─── ERC-20 subset used for funding ─────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract ERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

// ─── Companion token ────────────────────────────────────────────────────────
sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract AttractorToken {
        constructor(string name, string symbol, uint256 initialSupply);

        function decimals() external view returns (uint8);
    }
}
