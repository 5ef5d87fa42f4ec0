use {
    crate::{
        CommitmentLevel, ConfirmOutcome, RpcError, SignedTransaction, SubmitOptions, WalletError,
    },
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction},
};

/// Result of the connectivity probe. Purely diagnostic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ProbeStatus {
    Ok { version: String },
    Degraded { reason: String },
}

impl ProbeStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProbeStatus::Ok { .. })
    }
}

/// The remote ledger, as seen by the vote flow.
///
/// None of the methods retry; that is left to the caller.
#[async_trait]
pub trait LedgerClient {
    /// Check that the node answers. Never fails: an unreachable node is
    /// reported as [`ProbeStatus::Degraded`].
    async fn probe(&self) -> ProbeStatus;

    /// Balance of `address`, in lamports.
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, RpcError>;

    /// The latest blockhash and the last block height at which a transaction
    /// referencing it is still valid.
    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentLevel,
    ) -> Result<(Hash, u64), RpcError>;

    async fn submit(
        &self,
        tx: &SignedTransaction,
        opts: SubmitOptions,
    ) -> Result<Signature, RpcError>;

    /// Wait until `signature` reaches `commitment`, fails on chain, outlives
    /// `last_valid_block_height`, or the client's timeout elapses.
    async fn confirm(
        &self,
        signature: &Signature,
        blockhash: &Hash,
        last_valid_block_height: u64,
        commitment: CommitmentLevel,
    ) -> ConfirmOutcome;
}

/// A wallet capability that holds the user's key.
#[async_trait]
pub trait WalletProvider {
    fn is_available(&self) -> bool;

    /// Ask for the wallet's public key.
    ///
    /// With `only_if_trusted`, the wallet must not prompt the user, and fails
    /// unless this origin was approved before.
    async fn connect(&self, only_if_trusted: bool) -> Result<Pubkey, WalletError>;

    async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, WalletError>;
}
