//! Wire shapes of the JSON-RPC responses we consume.

use {
    ballot_types::{CommitmentLevel, RpcRejection},
    serde::Deserialize,
    serde_json::Value,
};

#[derive(Deserialize, Debug)]
pub(crate) struct Envelope<T> {
    pub result: Option<T>,
    pub error: Option<RpcRejection>,
}

/// Many methods wrap their result as `{ "context": { "slot": .. }, "value": .. }`.
#[derive(Deserialize, Debug)]
pub(crate) struct WithContext<T> {
    pub value: T,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RpcVersionInfo {
    #[serde(rename = "solana-core")]
    pub solana_core: String,
    #[serde(rename = "feature-set", default)]
    pub feature_set: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RpcSignatureStatus {
    pub slot: u64,
    /// `None` once the block is rooted.
    #[serde(default)]
    pub confirmations: Option<u64>,
    /// Execution error, if the transaction failed on chain.
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<CommitmentLevel>,
}

impl RpcSignatureStatus {
    /// The commitment this status has reached. Nodes that omit
    /// `confirmationStatus` report rooted blocks with `confirmations: null`.
    pub fn reached(&self) -> CommitmentLevel {
        match (self.confirmation_status, self.confirmations) {
            (Some(level), _) => level,
            (None, None) => CommitmentLevel::Finalized,
            (None, Some(_)) => CommitmentLevel::Processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn parses_signature_status() {
        let status: RpcSignatureStatus = serde_json::from_value(json!({
            "slot": 72,
            "confirmations": 10,
            "err": null,
            "status": { "Ok": null },
            "confirmationStatus": "confirmed",
        }))
        .unwrap();

        assert_eq!(status.reached(), CommitmentLevel::Confirmed);
        assert!(status.err.is_none());
    }

    #[test]
    fn legacy_rooted_status_is_finalized() {
        let status: RpcSignatureStatus =
            serde_json::from_value(json!({ "slot": 1, "confirmations": null, "err": null }))
                .unwrap();

        assert_eq!(status.reached(), CommitmentLevel::Finalized);
    }

    #[test]
    fn envelope_with_error() {
        let envelope: Envelope<String> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": -32002,
                "message": "Transaction simulation failed",
                "data": { "err": "BlockhashNotFound" },
            },
        }))
        .unwrap();

        assert!(envelope.result.is_none());
        assert_eq!(
            envelope.error.unwrap().transaction_error(),
            Some("BlockhashNotFound")
        );
    }
}
