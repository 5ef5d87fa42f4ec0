#[cfg(feature = "tracing")]
use tracing::{debug, warn};
use {
    crate::{Envelope, RpcBlockhash, RpcSignatureStatus, RpcVersionInfo, WithContext},
    async_trait::async_trait,
    ballot_types::{
        CommitmentLevel, ConfirmOutcome, Hash, LedgerClient, ProbeStatus, Pubkey, RpcError,
        Signature, SignedTransaction, SubmitOptions,
    },
    base64::{Engine, engine::general_purpose::STANDARD},
    reqwest::IntoUrl,
    serde::de::DeserializeOwned,
    serde_json::{Value, json},
    std::{
        str::FromStr,
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Duration,
    },
    tokio::time::MissedTickBehavior,
    url::Url,
};

/// Timeouts and pacing for [`RpcClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Applies to every individual HTTP request.
    pub request_timeout: Duration,
    /// Upper bound on [`LedgerClient::confirm`], however many polls it takes.
    pub confirm_timeout: Duration,
    /// Pause between signature status polls. Raised to
    /// [`MIN_POLL_INTERVAL`](Self::MIN_POLL_INTERVAL) if shorter.
    pub poll_interval: Duration,
}

impl ClientOptions {
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// A client for a Solana-compatible JSON-RPC node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    inner: reqwest::Client,
    endpoint: Url,
    options: ClientOptions,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new<U>(endpoint: U) -> Result<Self, RpcError>
    where
        U: IntoUrl,
    {
        Self::with_options(endpoint, ClientOptions::default())
    }

    pub fn with_options<U>(endpoint: U, options: ClientOptions) -> Result<Self, RpcError>
    where
        U: IntoUrl,
    {
        let endpoint = endpoint.into_url().map_err(RpcError::transport)?;
        let inner = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(RpcError::transport)?;

        Ok(Self {
            inner,
            endpoint,
            options,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    async fn call<T>(&self, method: &str, params: Value) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .inner
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(RpcError::transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(RpcError::transport)?;

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(RpcError::Transport(format!("{method} returned HTTP {status}")));
            },
            Err(err) => return Err(RpcError::decode(err)),
        };

        match (envelope.result, envelope.error) {
            (_, Some(rejection)) => Err(RpcError::Rejected(rejection)),
            (Some(result), None) => Ok(result),
            (None, None) => Err(RpcError::Decode(format!(
                "{method} response has neither result nor error"
            ))),
        }
    }

    pub async fn get_version(&self) -> Result<RpcVersionInfo, RpcError> {
        self.call("getVersion", json!([])).await
    }

    pub async fn get_block_height(&self, commitment: CommitmentLevel) -> Result<u64, RpcError> {
        self.call("getBlockHeight", json!([{ "commitment": commitment }]))
            .await
    }

    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<RpcSignatureStatus>, RpcError> {
        let response: WithContext<Vec<Option<RpcSignatureStatus>>> = self
            .call(
                "getSignatureStatuses",
                json!([[signature.to_string()], { "searchTransactionHistory": false }]),
            )
            .await?;

        Ok(response.value.into_iter().next().flatten())
    }

    /// Poll until the transaction settles one way or the other. Unbounded;
    /// the caller applies the timeout.
    async fn poll_confirmation(
        &self,
        signature: &Signature,
        blockhash: &Hash,
        last_valid_block_height: u64,
        commitment: CommitmentLevel,
    ) -> ConfirmOutcome {
        let mut ticker =
            tokio::time::interval(self.options.poll_interval.max(ClientOptions::MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            // Status first: a transaction that landed right before its
            // blockhash expired still counts.
            match self.get_signature_status(signature).await {
                Ok(Some(status)) => {
                    if let Some(err) = status.err {
                        return ConfirmOutcome::Failed(format!(
                            "transaction failed on chain: {err}"
                        ));
                    }

                    if commitment.is_satisfied_by(status.reached()) {
                        #[cfg(feature = "tracing")]
                        debug!(%signature, slot = status.slot, "Transaction confirmed");
                        return ConfirmOutcome::Confirmed;
                    }
                },
                Ok(None) => {},
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    warn!(%signature, err = %_err, "Failed to query signature status, retrying");
                },
            }

            match self.get_block_height(commitment).await {
                Ok(height) if height > last_valid_block_height => {
                    return ConfirmOutcome::Failed(format!(
                        "blockhash {blockhash} expired at block height {height} (last valid {last_valid_block_height})"
                    ));
                },
                Ok(_) => {},
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    warn!(err = %_err, "Failed to query block height, retrying");
                },
            }
        }
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn probe(&self) -> ProbeStatus {
        match self.get_version().await {
            Ok(version) => ProbeStatus::Ok {
                version: version.solana_core,
            },
            Err(err) => ProbeStatus::Degraded {
                reason: err.to_string(),
            },
        }
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, RpcError> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([address.to_string(), { "commitment": CommitmentLevel::Confirmed }]),
            )
            .await?;

        Ok(response.value)
    }

    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentLevel,
    ) -> Result<(Hash, u64), RpcError> {
        let response: WithContext<RpcBlockhash> = self
            .call("getLatestBlockhash", json!([{ "commitment": commitment }]))
            .await?;

        let blockhash = Hash::from_str(&response.value.blockhash).map_err(RpcError::decode)?;

        Ok((blockhash, response.value.last_valid_block_height))
    }

    async fn submit(
        &self,
        tx: &SignedTransaction,
        opts: SubmitOptions,
    ) -> Result<Signature, RpcError> {
        let signature: String = self
            .call(
                "sendTransaction",
                json!([STANDARD.encode(&tx.wire), {
                    "encoding": "base64",
                    "skipPreflight": opts.skip_preflight,
                    "preflightCommitment": opts.preflight_commitment,
                }]),
            )
            .await?;

        Signature::from_str(&signature).map_err(RpcError::decode)
    }

    async fn confirm(
        &self,
        signature: &Signature,
        blockhash: &Hash,
        last_valid_block_height: u64,
        commitment: CommitmentLevel,
    ) -> ConfirmOutcome {
        let timeout = self.options.confirm_timeout;

        match tokio::time::timeout(
            timeout,
            self.poll_confirmation(signature, blockhash, last_valid_block_height, commitment),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => ConfirmOutcome::Failed(format!(
                "transaction was not confirmed within {}s",
                timeout.as_secs_f64()
            )),
        }
    }
}
