use {
    async_trait::async_trait,
    ballot_types::{Pubkey, Transaction, WalletError, WalletProvider},
    solana_sdk::signature::{Keypair, Signer},
    std::sync::{Arc, Mutex, MutexGuard},
};

/// A call received by [`MockWallet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletCall {
    Connect { only_if_trusted: bool },
    Sign,
}

struct WalletState {
    available: bool,
    trusted: bool,
    connect: Option<WalletError>,
    sign: Option<WalletError>,
    calls: Vec<WalletCall>,
}

/// A wallet holding a freshly generated keypair that approves everything
/// unless told otherwise.
#[derive(Clone)]
pub struct MockWallet {
    keypair: Arc<Keypair>,
    state: Arc<Mutex<WalletState>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            keypair: Arc::new(Keypair::new()),
            state: Arc::new(Mutex::new(WalletState {
                available: true,
                trusted: false,
                connect: None,
                sign: None,
                calls: vec![],
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, WalletState> {
        self.state
            .lock()
            .unwrap_or_else(|err| panic!("MockWallet is poisoned: {err:?}"))
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn unavailable(self) -> Self {
        self.lock().available = false;
        self
    }

    /// Whether a silent (`only_if_trusted`) connect succeeds.
    pub fn trusted(self, trusted: bool) -> Self {
        self.lock().trusted = trusted;
        self
    }

    pub fn failing_connect(self, err: WalletError) -> Self {
        self.lock().connect = Some(err);
        self
    }

    pub fn failing_sign(self, err: WalletError) -> Self {
        self.lock().sign = Some(err);
        self
    }

    pub fn rejecting_sign(self) -> Self {
        self.failing_sign(WalletError::UserRejected)
    }

    pub fn calls(&self) -> Vec<WalletCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn is_available(&self) -> bool {
        self.lock().available
    }

    async fn connect(&self, only_if_trusted: bool) -> Result<Pubkey, WalletError> {
        let mut state = self.lock();
        state.calls.push(WalletCall::Connect { only_if_trusted });

        if let Some(err) = &state.connect {
            return Err(err.clone());
        }

        if only_if_trusted && !state.trusted {
            return Err(WalletError::from_provider(Some(4001), "origin is not trusted"));
        }

        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, WalletError> {
        {
            let mut state = self.lock();
            state.calls.push(WalletCall::Sign);

            if let Some(err) = &state.sign {
                return Err(err.clone());
            }
        }

        let recent_blockhash = tx.message.recent_blockhash;
        tx.try_sign(&[self.keypair.as_ref()], recent_blockhash)
            .map_err(|err| WalletError::provider(err.to_string()))?;

        Ok(tx)
    }
}
