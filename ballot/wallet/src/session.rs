#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};
use {
    ballot_types::{
        FAUCET_URL, LOW_BALANCE_THRESHOLD, LedgerClient, Presenter, Severity, Transaction, UiEvent,
        WALLET_INSTALL_URL, WalletError, WalletIdentity, WalletProvider, lamports_to_sol,
    },
    std::{
        sync::{Arc, Mutex, MutexGuard},
        time::Duration,
    },
};

/// How long to wait before pointing the user at the wallet install page.
pub const INSTALL_LINK_DELAY: Duration = Duration::from_secs(2);

/// The connected wallet, if any, and what we know about it.
///
/// Clones share the same identity.
pub struct WalletSession<W> {
    wallet: Option<Arc<W>>,
    identity: Arc<Mutex<Option<WalletIdentity>>>,
    presenter: Presenter,
}

impl<W> Clone for WalletSession<W> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            identity: Arc::clone(&self.identity),
            presenter: self.presenter.clone(),
        }
    }
}

impl<W> WalletSession<W>
where
    W: WalletProvider + Send + Sync,
{
    /// `wallet` is `None` when no wallet is installed.
    pub fn new(wallet: Option<W>, presenter: Presenter) -> Self {
        Self {
            wallet: wallet.map(Arc::new),
            identity: Arc::new(Mutex::new(None)),
            presenter,
        }
    }

    pub fn wallet(&self) -> Option<&W> {
        self.wallet.as_deref()
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    fn lock(&self) -> MutexGuard<'_, Option<WalletIdentity>> {
        self.identity
            .lock()
            .unwrap_or_else(|err| panic!("WalletSession is poisoned: {err:?}"))
    }

    pub fn current_identity(&self) -> Option<WalletIdentity> {
        self.lock().clone()
    }

    fn available_wallet(&self) -> Option<&W> {
        self.wallet().filter(|wallet| wallet.is_available())
    }

    fn set_identity(&self, identity: Option<WalletIdentity>) {
        *self.lock() = identity.clone();
        self.presenter.emit(UiEvent::Identity(identity));
    }

    /// Ask the wallet to connect, prompting the user if needed.
    ///
    /// Every failure is reported to the user once before being returned.
    pub async fn connect<C>(&self, client: Option<&C>) -> Result<WalletIdentity, WalletError>
    where
        C: LedgerClient + Sync + ?Sized,
    {
        let Some(wallet) = self.available_wallet() else {
            self.presenter
                .toast("Wallet not found. Please install a wallet.", Severity::Error);
            self.presenter.emit(UiEvent::ExternalLink {
                url: WALLET_INSTALL_URL.to_string(),
                delay: INSTALL_LINK_DELAY,
            });
            return Err(WalletError::NotFound);
        };

        let result = {
            let _loading = self.presenter.loading("Connecting to wallet...");
            wallet.connect(false).await
        };

        let address = match result {
            Ok(address) => address,
            Err(err) => {
                #[cfg(feature = "tracing")]
                warn!(%err, "Wallet connection failed");

                match &err {
                    WalletError::UserRejected => self
                        .presenter
                        .toast("Wallet connection was rejected by user", Severity::Warning),
                    WalletError::NotFound => self
                        .presenter
                        .toast("Wallet not found. Please install a wallet.", Severity::Error),
                    WalletError::Provider { message, .. } => self.presenter.toast(
                        format!("Failed to connect wallet: {message}"),
                        Severity::Error,
                    ),
                }

                return Err(err);
            },
        };

        #[cfg(feature = "tracing")]
        info!(%address, "Wallet connected");

        self.set_identity(Some(WalletIdentity::new(address)));

        if let Some(client) = client {
            self.refresh_balance(client).await;
        }

        self.presenter
            .toast("Wallet connected successfully!", Severity::Success);

        Ok(self.current_identity().unwrap_or_else(|| WalletIdentity::new(address)))
    }

    /// Reconnect silently if the wallet already trusts us. Never prompts and
    /// never notifies on failure.
    pub async fn connect_trusted<C>(&self, client: Option<&C>) -> Option<WalletIdentity>
    where
        C: LedgerClient + Sync + ?Sized,
    {
        let wallet = self.available_wallet()?;

        let address = match wallet.connect(true).await {
            Ok(address) => address,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                debug!(err = %_err, "No existing trusted connection");
                return None;
            },
        };

        #[cfg(feature = "tracing")]
        info!(%address, "Existing wallet connection found");

        self.set_identity(Some(WalletIdentity::new(address)));

        if let Some(client) = client {
            self.refresh_balance(client).await;
        }

        self.current_identity()
    }

    /// Forget the identity. The wallet keeps whatever trust it granted.
    pub fn disconnect(&self) {
        if self.lock().is_some() {
            self.set_identity(None);
        }
    }

    pub async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, WalletError> {
        let wallet = self.available_wallet().ok_or(WalletError::NotFound)?;

        wallet.sign_transaction(tx).await
    }

    /// Fetch the balance of the connected address, in SOL.
    ///
    /// Failures are logged and leave the cached balance as it was.
    pub async fn refresh_balance<C>(&self, client: &C) -> Option<f64>
    where
        C: LedgerClient + Sync + ?Sized,
    {
        let address = self.current_identity()?.address;

        let balance = match client.get_balance(&address).await {
            Ok(lamports) => lamports_to_sol(lamports),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                warn!(%address, err = %_err, "Failed to get wallet balance");
                return None;
            },
        };

        #[cfg(feature = "tracing")]
        debug!(%address, balance, "Wallet balance");

        let updated = {
            let mut identity = self.lock();
            match identity.as_mut() {
                // Only if the same wallet is still connected.
                Some(current) if current.address == address => {
                    current.balance = Some(balance);
                    Some(current.clone())
                },
                _ => None,
            }
        };

        let updated = updated?;
        self.presenter.emit(UiEvent::Identity(Some(updated)));

        if balance < LOW_BALANCE_THRESHOLD {
            self.presenter.toast(
                format!("Low balance! Get free Devnet SOL from {FAUCET_URL}"),
                Severity::Warning,
            );
        }

        Some(balance)
    }
}
