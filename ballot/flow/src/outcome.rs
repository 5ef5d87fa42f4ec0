use ballot_types::{
    RejectionKind, RpcError, Severity, Signature, VoteOption, VoteTally, WalletError,
};

/// Why a vote did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// No wallet is connected.
    NoWallet,
    /// No ledger client is available.
    NoConnection,
    /// The user declined to sign.
    Cancelled,
    WalletNotFound,
    /// Any other wallet failure.
    Wallet(String),
    NetworkError(String),
    InsufficientFunds,
    StaleBlockhash,
    /// The node refused the transaction for a reason we don't classify.
    Rejected(String),
    /// Executed and failed, expired, or never confirmed in time.
    OnChainError(String),
    /// Confirmed on chain, but the tally could not be saved.
    Storage(String),
}

impl AbortReason {
    pub fn from_wallet(err: WalletError) -> Self {
        match err {
            WalletError::UserRejected => AbortReason::Cancelled,
            WalletError::NotFound => AbortReason::WalletNotFound,
            WalletError::Provider { message, .. } => AbortReason::Wallet(message),
        }
    }

    /// Classify a failed `submit`.
    pub fn from_submit(err: RpcError) -> Self {
        match err {
            RpcError::Rejected(rejection) => match rejection.kind() {
                RejectionKind::InsufficientFunds => AbortReason::InsufficientFunds,
                RejectionKind::StaleBlockhash => AbortReason::StaleBlockhash,
                RejectionKind::Other => AbortReason::Rejected(rejection.message),
            },
            RpcError::Transport(_) | RpcError::Decode(_) => {
                AbortReason::NetworkError(err.to_string())
            },
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AbortReason::Cancelled => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether trying again unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AbortReason::NoConnection | AbortReason::NetworkError(_) | AbortReason::StaleBlockhash
        )
    }

    /// The notification shown to the user.
    pub fn message(&self) -> String {
        match self {
            AbortReason::NoWallet => "Please connect your wallet first".to_string(),
            AbortReason::NoConnection => "No connection to Solana network".to_string(),
            AbortReason::Cancelled => "Transaction was cancelled".to_string(),
            AbortReason::WalletNotFound => "Wallet not found. Please install a wallet.".to_string(),
            AbortReason::NetworkError(_) | AbortReason::StaleBlockhash => {
                "Network issue - please try again".to_string()
            },
            AbortReason::InsufficientFunds => {
                "Insufficient SOL balance for transaction".to_string()
            },
            AbortReason::Wallet(detail)
            | AbortReason::Rejected(detail)
            | AbortReason::OnChainError(detail) => format!("Failed to cast vote: {detail}"),
            AbortReason::Storage(_) => {
                "Vote confirmed but the local tally could not be saved".to_string()
            },
        }
    }
}

/// The single terminal result of one `cast_vote`.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    Committed {
        option: VoteOption,
        signature: Signature,
        tally: VoteTally,
    },
    Aborted(AbortReason),
}

impl VoteOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, VoteOutcome::Committed { .. })
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            VoteOutcome::Aborted(reason) => Some(reason),
            VoteOutcome::Committed { .. } => None,
        }
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, ballot_types::RpcRejection, serde_json::json, test_case::test_case};

    #[test_case(WalletError::UserRejected => AbortReason::Cancelled; "rejection")]
    #[test_case(WalletError::NotFound => AbortReason::WalletNotFound; "not found")]
    #[test_case(WalletError::provider("locked") => AbortReason::Wallet("locked".into()); "other")]
    fn wallet_failures(err: WalletError) -> AbortReason {
        AbortReason::from_wallet(err)
    }

    #[test_case(
        RpcError::Rejected(RpcRejection::new(-32002, "Transaction simulation failed")
            .with_data(json!({ "err": "InsufficientFundsForFee" })))
        => AbortReason::InsufficientFunds;
        "insufficient funds"
    )]
    #[test_case(
        RpcError::Rejected(RpcRejection::new(-32002, "Blockhash not found"))
        => AbortReason::StaleBlockhash;
        "stale blockhash"
    )]
    #[test_case(
        RpcError::Rejected(RpcRejection::new(-32602, "Transaction failed to sanitize"))
        => AbortReason::Rejected("Transaction failed to sanitize".into());
        "other rejection"
    )]
    #[test_case(
        RpcError::Transport("connection refused".into())
        => AbortReason::NetworkError("transport error: connection refused".into());
        "transport"
    )]
    fn submit_failures(err: RpcError) -> AbortReason {
        AbortReason::from_submit(err)
    }

    #[test]
    fn only_cancellation_is_a_warning() {
        assert_eq!(AbortReason::Cancelled.severity(), Severity::Warning);
        assert_eq!(AbortReason::InsufficientFunds.severity(), Severity::Error);
        assert_eq!(AbortReason::NoWallet.severity(), Severity::Error);
    }

    #[test]
    fn messages() {
        assert_eq!(
            AbortReason::OnChainError("blockhash expired".into()).message(),
            "Failed to cast vote: blockhash expired"
        );
        assert_eq!(
            AbortReason::StaleBlockhash.message(),
            "Network issue - please try again"
        );
        assert!(AbortReason::StaleBlockhash.is_retryable());
        assert!(!AbortReason::OnChainError(String::new()).is_retryable());
    }
}
