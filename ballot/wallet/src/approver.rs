use {
    async_trait::async_trait,
    ballot_types::{Hash, MEMO_PROGRAM_ID, Pubkey, Transaction},
};

/// What the user is shown before a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    pub origin: String,
    pub fee_payer: Option<Pubkey>,
    pub recent_blockhash: Hash,
    /// Text of every memo instruction, in order.
    pub memos: Vec<String>,
    /// Instructions that are not memos.
    pub other_instructions: usize,
}

impl SignatureRequest {
    pub fn new(origin: &str, tx: &Transaction) -> Self {
        let message = &tx.message;
        let mut memos = vec![];
        let mut other_instructions = 0;

        for ix in &message.instructions {
            match message.account_keys.get(usize::from(ix.program_id_index)) {
                Some(program) if *program == MEMO_PROGRAM_ID => {
                    memos.push(String::from_utf8_lossy(&ix.data).into_owned());
                },
                _ => other_instructions += 1,
            }
        }

        Self {
            origin: origin.to_string(),
            fee_payer: message.account_keys.first().copied(),
            recent_blockhash: message.recent_blockhash,
            memos,
            other_instructions,
        }
    }
}

/// Asks the key holder to approve a connection or a signature.
#[async_trait]
pub trait Approver {
    async fn approve_connection(&self, origin: &str, pubkey: &Pubkey) -> bool;

    async fn approve_transaction(&self, request: &SignatureRequest) -> bool;
}

/// Approves everything. For non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Approver for AutoApprove {
    async fn approve_connection(&self, _origin: &str, _pubkey: &Pubkey) -> bool {
        true
    }

    async fn approve_transaction(&self, _request: &SignatureRequest) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        ballot_types::{VoteOption, VoteTransactionRequest},
        chrono::{TimeZone, Utc},
    };

    #[test]
    fn summarizes_a_vote() {
        let fee_payer = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let tx = VoteTransactionRequest::new(VoteOption::A, fee_payer, blockhash, 9, now)
            .unsigned_transaction();

        let request = SignatureRequest::new("ballot-cli", &tx);

        assert_eq!(request.fee_payer, Some(fee_payer));
        assert_eq!(request.recent_blockhash, blockhash);
        assert_eq!(request.memos, vec!["Vote for option 1 - 1700000000000000"]);
        assert_eq!(request.other_instructions, 0);
    }
}
