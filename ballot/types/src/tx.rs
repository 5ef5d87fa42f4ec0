use {
    crate::{CommitmentLevel, MEMO_PROGRAM_ID, RpcError, VoteOption},
    chrono::{DateTime, Utc},
    solana_sdk::{
        hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey,
        signature::Signature, transaction::Transaction,
    },
};

/// Everything needed to build one vote transaction.
///
/// Lives for the duration of a single vote and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTransactionRequest {
    pub option: VoteOption,
    pub memo: String,
    pub fee_payer: Pubkey,
    pub recent_blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl VoteTransactionRequest {
    pub fn new(
        option: VoteOption,
        fee_payer: Pubkey,
        recent_blockhash: Hash,
        last_valid_block_height: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            option,
            memo: vote_memo(option, now),
            fee_payer,
            recent_blockhash,
            last_valid_block_height,
        }
    }

    /// The memo instruction carrying the vote. It references no accounts, so
    /// the fee payer is the only signer.
    pub fn instruction(&self) -> Instruction {
        Instruction::new_with_bytes(MEMO_PROGRAM_ID, self.memo.as_bytes(), vec![])
    }

    /// An unsigned transaction ready to be handed to the wallet.
    pub fn unsigned_transaction(&self) -> Transaction {
        let mut message = Message::new(&[self.instruction()], Some(&self.fee_payer));
        message.recent_blockhash = self.recent_blockhash;

        Transaction::new_unsigned(message)
    }
}

/// The memo embeds the 1-based option number and a microsecond timestamp, so
/// that two votes for the same option never produce identical transactions.
pub fn vote_memo(option: VoteOption, now: DateTime<Utc>) -> String {
    format!("Vote for option {} - {}", option.index() + 1, now.timestamp_micros())
}

/// A transaction signed by the wallet, together with its wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub wire: Vec<u8>,
}

impl SignedTransaction {
    pub fn new(transaction: Transaction) -> Result<Self, bincode::Error> {
        let wire = bincode::serialize(&transaction)?;

        Ok(Self { transaction, wire })
    }

    /// The fee payer's signature, which identifies the transaction on chain.
    pub fn signature(&self) -> Signature {
        self.transaction.signatures.first().copied().unwrap_or_default()
    }

    pub fn is_fully_signed(&self) -> bool {
        self.transaction.is_signed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: CommitmentLevel,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: CommitmentLevel::Confirmed,
        }
    }
}

/// Result of waiting for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    /// The ledger executed the transaction and it failed, the blockhash
    /// expired before confirmation, or we gave up waiting.
    Failed(String),
}

/// What became of a vote transaction once it left the wallet.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOutcome {
    Confirmed(Signature),
    Rejected(RpcError),
    Failed(String),
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone};

    fn request() -> VoteTransactionRequest {
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();

        VoteTransactionRequest::new(
            VoteOption::C,
            Pubkey::new_unique(),
            Hash::new_unique(),
            321,
            now,
        )
    }

    #[test]
    fn memo_embeds_option_and_timestamp() {
        assert_eq!(request().memo, "Vote for option 3 - 1700000000123456");
    }

    #[test]
    fn unsigned_transaction_is_a_single_memo() {
        let request = request();
        let tx = request.unsigned_transaction();

        assert_eq!(tx.message.account_keys[0], request.fee_payer);
        assert_eq!(tx.message.recent_blockhash, request.recent_blockhash);
        assert_eq!(tx.message.header.num_required_signatures, 1);
        assert_eq!(tx.message.instructions.len(), 1);
        assert_eq!(tx.message.instructions[0].data, request.memo.as_bytes());
        assert_eq!(
            tx.message.account_keys[tx.message.instructions[0].program_id_index as usize],
            MEMO_PROGRAM_ID
        );
        assert!(!tx.is_signed());
    }
}
