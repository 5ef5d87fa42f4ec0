use solana_sdk::pubkey::Pubkey;

/// The SPL Memo program, `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`.
pub const MEMO_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    5, 74, 83, 90, 153, 41, 33, 6, 77, 36, 232, 113, 96, 218, 56, 124, 124, 53, 181, 221, 188, 146,
    187, 129, 228, 31, 168, 64, 65, 5, 68, 141,
]);

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Below this balance (in SOL) the user is nudged towards the faucet.
pub const LOW_BALANCE_THRESHOLD: f64 = 0.01;

pub const FAUCET_URL: &str = "https://faucet.solana.com";

pub const WALLET_INSTALL_URL: &str = "https://phantom.app/";

/// Error code a wallet uses when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Storage key holding the serialized tally.
pub const TALLY_STORAGE_KEY: &str = "votingData";
