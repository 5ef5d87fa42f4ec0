use {
    crate::USER_REJECTED_CODE,
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::fmt,
};

// ---------------------------------- wallet -----------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("user rejected the request")]
    UserRejected,

    #[error("no wallet available")]
    NotFound,

    #[error("wallet error (code {code:?}): {message}")]
    Provider { code: Option<i64>, message: String },
}

impl WalletError {
    /// Classify an error reported by a wallet that only exposes a numeric code
    /// and a message.
    ///
    /// Code 4001 and the message fragment `User rejected` both mean the user
    /// declined; anything else is passed through as a provider error.
    pub fn from_provider<M>(code: Option<i64>, message: M) -> Self
    where
        M: Into<String>,
    {
        let message = message.into();

        if code == Some(USER_REJECTED_CODE) || message.contains("User rejected") {
            return WalletError::UserRejected;
        }

        WalletError::Provider { code, message }
    }

    pub fn provider<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        WalletError::Provider {
            code: None,
            message: message.into(),
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, WalletError::UserRejected)
    }
}

// ------------------------------------ rpc ------------------------------------

/// A JSON-RPC error object returned by the ledger node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcRejection {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcRejection {
    pub fn new<M>(code: i64, message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The transaction error name reported by preflight simulation, if any.
    ///
    /// Preflight failures carry `data.err`, either as a bare string such as
    /// `"BlockhashNotFound"` or as a single-key object such as
    /// `{"InsufficientFundsForRent": {"account_index": 0}}`.
    pub fn transaction_error(&self) -> Option<&str> {
        match self.data.as_ref()?.get("err")? {
            Value::String(name) => Some(name),
            Value::Object(map) => map.keys().next().map(String::as_str),
            _ => None,
        }
    }

    /// Coarse classification of why the node refused the transaction.
    ///
    /// The structured preflight error wins. When the node gives nothing but a
    /// message, fall back to matching well-known fragments of it.
    pub fn kind(&self) -> RejectionKind {
        match self.transaction_error() {
            Some("BlockhashNotFound") => return RejectionKind::StaleBlockhash,
            Some("InsufficientFundsForFee" | "InsufficientFundsForRent" | "AccountNotFound") => {
                return RejectionKind::InsufficientFunds;
            },
            _ => {},
        }

        let message = self.message.to_ascii_lowercase();

        if message.contains("insufficient") || message.contains("no record of a prior credit") {
            RejectionKind::InsufficientFunds
        } else if message.contains("blockhash") {
            RejectionKind::StaleBlockhash
        } else {
            RejectionKind::Other
        }
    }
}

impl fmt::Display for RpcRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    InsufficientFunds,
    StaleBlockhash,
    Other,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RpcError {
    /// The node could not be reached, or the request timed out.
    #[error("transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error.
    #[error("rpc rejected the request: {0}")]
    Rejected(RpcRejection),

    /// The node answered with something we could not make sense of.
    #[error("failed to decode rpc response: {0}")]
    Decode(String),
}

impl RpcError {
    pub fn transport<E>(err: E) -> Self
    where
        E: ToString,
    {
        RpcError::Transport(err.to_string())
    }

    pub fn decode<E>(err: E) -> Self
    where
        E: ToString,
    {
        RpcError::Decode(err.to_string())
    }
}

// ----------------------------------- tests -----------------------------------
