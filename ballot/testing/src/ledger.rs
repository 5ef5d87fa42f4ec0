use {
    async_trait::async_trait,
    ballot_types::{
        CommitmentLevel, ConfirmOutcome, Hash, LedgerClient, ProbeStatus, Pubkey, RpcError,
        RpcRejection, Signature, SignedTransaction, SubmitOptions,
    },
    std::sync::{Arc, Mutex, MutexGuard},
};

/// A call received by [`MockLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Probe,
    GetBalance(Pubkey),
    GetLatestBlockhash(CommitmentLevel),
    Submit(SubmitOptions),
    Confirm {
        signature: Signature,
        last_valid_block_height: u64,
    },
}

struct LedgerState {
    probe: ProbeStatus,
    balance: Result<u64, RpcError>,
    blockhash: Result<(Hash, u64), RpcError>,
    /// `None` accepts the transaction and returns its own signature.
    submit: Option<RpcError>,
    confirm: ConfirmOutcome,
    calls: Vec<LedgerCall>,
    submitted: Vec<SignedTransaction>,
}

/// An in-process ledger with scripted answers. Clones share state, so a test
/// can keep one to inspect the calls made through another.
#[derive(Clone)]
pub struct MockLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    pub const BLOCKHASH: Hash = Hash::new_from_array([42; 32]);
    pub const LAST_VALID_BLOCK_HEIGHT: u64 = 1_000;

    /// A healthy ledger: the fee payer holds 1 SOL and every transaction
    /// confirms.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                probe: ProbeStatus::Ok {
                    version: "mock".to_string(),
                },
                balance: Ok(1_000_000_000),
                blockhash: Ok((Self::BLOCKHASH, Self::LAST_VALID_BLOCK_HEIGHT)),
                submit: None,
                confirm: ConfirmOutcome::Confirmed,
                calls: vec![],
                submitted: vec![],
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state
            .lock()
            .unwrap_or_else(|err| panic!("MockLedger is poisoned: {err:?}"))
    }

    pub fn with_probe(self, probe: ProbeStatus) -> Self {
        self.lock().probe = probe;
        self
    }

    pub fn with_balance(self, lamports: u64) -> Self {
        self.lock().balance = Ok(lamports);
        self
    }

    pub fn failing_balance(self, err: RpcError) -> Self {
        self.lock().balance = Err(err);
        self
    }

    pub fn failing_blockhash(self, err: RpcError) -> Self {
        self.lock().blockhash = Err(err);
        self
    }

    pub fn rejecting_submit(self, rejection: RpcRejection) -> Self {
        self.failing_submit(RpcError::Rejected(rejection))
    }

    pub fn failing_submit(self, err: RpcError) -> Self {
        self.lock().submit = Some(err);
        self
    }

    pub fn with_confirm(self, outcome: ConfirmOutcome) -> Self {
        self.lock().confirm = outcome;
        self
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.lock().calls.clone()
    }

    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.lock().submitted.clone()
    }

    fn record(&self, call: LedgerCall) {
        self.lock().calls.push(call);
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn probe(&self) -> ProbeStatus {
        self.record(LedgerCall::Probe);
        self.lock().probe.clone()
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, RpcError> {
        self.record(LedgerCall::GetBalance(*address));
        self.lock().balance.clone()
    }

    async fn get_latest_blockhash(
        &self,
        commitment: CommitmentLevel,
    ) -> Result<(Hash, u64), RpcError> {
        self.record(LedgerCall::GetLatestBlockhash(commitment));
        self.lock().blockhash.clone()
    }

    async fn submit(
        &self,
        tx: &SignedTransaction,
        opts: SubmitOptions,
    ) -> Result<Signature, RpcError> {
        let mut state = self.lock();
        state.calls.push(LedgerCall::Submit(opts));

        if let Some(err) = &state.submit {
            return Err(err.clone());
        }

        state.submitted.push(tx.clone());

        Ok(tx.signature())
    }

    async fn confirm(
        &self,
        signature: &Signature,
        _blockhash: &Hash,
        last_valid_block_height: u64,
        _commitment: CommitmentLevel,
    ) -> ConfirmOutcome {
        self.record(LedgerCall::Confirm {
            signature: *signature,
            last_valid_block_height,
        });

        // Let concurrent flows interleave here, as they would while polling.
        tokio::task::yield_now().await;

        self.lock().confirm.clone()
    }
}
