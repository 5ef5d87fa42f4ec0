#[cfg(feature = "tracing")]
use tracing::{debug, info};
use {
    crate::{
        Approver, ED25519_SEED_LEN, KeystoreError, KeystoreResult, SignatureRequest, TrustedOrigins,
    },
    async_trait::async_trait,
    ballot_types::{Pubkey, Transaction, USER_REJECTED_CODE, WalletError, WalletProvider},
    solana_sdk::signer::{
        Signer,
        keypair::{Keypair, keypair_from_seed},
    },
    std::sync::{Mutex, MutexGuard},
};

/// Error code for requests from an origin the user has not connected.
pub const UNAUTHORIZED_CODE: i64 = 4100;

/// A wallet backed by a decrypted keystore seed.
///
/// Connections are remembered per origin in a [`TrustedOrigins`] list, and
/// every connection or signature the list doesn't cover goes through the
/// [`Approver`].
pub struct KeystoreWallet<A> {
    keypair: Keypair,
    origin: String,
    trusted: Mutex<TrustedOrigins>,
    approver: A,
}

impl<A> KeystoreWallet<A> {
    pub fn new<O>(
        seed: &[u8; ED25519_SEED_LEN],
        origin: O,
        trusted: TrustedOrigins,
        approver: A,
    ) -> KeystoreResult<Self>
    where
        O: Into<String>,
    {
        let keypair = keypair_from_seed(seed)
            .map_err(|err| KeystoreError::InvalidSeed(err.to_string()))?;

        Ok(Self {
            keypair,
            origin: origin.into(),
            trusted: Mutex::new(trusted),
            approver,
        })
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn trusted(&self) -> MutexGuard<'_, TrustedOrigins> {
        self.trusted
            .lock()
            .unwrap_or_else(|err| panic!("TrustedOrigins is poisoned: {err:?}"))
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted().contains(&self.origin)
    }

    /// Forget this origin, so the next connection must be approved again.
    /// Returns whether it was trusted.
    pub fn revoke(&self) -> KeystoreResult<bool> {
        let revoked = self.trusted().revoke(&self.origin)?;

        #[cfg(feature = "tracing")]
        if revoked {
            info!(origin = %self.origin, "Revoked trusted origin");
        }

        Ok(revoked)
    }
}

#[async_trait]
impl<A> WalletProvider for KeystoreWallet<A>
where
    A: Approver + Send + Sync,
{
    fn is_available(&self) -> bool {
        true
    }

    async fn connect(&self, only_if_trusted: bool) -> Result<Pubkey, WalletError> {
        let pubkey = self.pubkey();

        if self.is_trusted() {
            return Ok(pubkey);
        }

        if only_if_trusted {
            return Err(WalletError::from_provider(
                Some(USER_REJECTED_CODE),
                "origin has not been approved",
            ));
        }

        if !self.approver.approve_connection(&self.origin, &pubkey).await {
            return Err(WalletError::UserRejected);
        }

        self.trusted()
            .trust(&self.origin)
            .map_err(|err| WalletError::provider(format!("failed to remember origin: {err}")))?;

        #[cfg(feature = "tracing")]
        info!(origin = %self.origin, %pubkey, "Approved connection");

        Ok(pubkey)
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, WalletError> {
        if !self.is_trusted() {
            return Err(WalletError::Provider {
                code: Some(UNAUTHORIZED_CODE),
                message: "origin is not connected".to_string(),
            });
        }

        let request = SignatureRequest::new(&self.origin, &tx);

        if request.fee_payer != Some(self.pubkey()) {
            return Err(WalletError::provider(
                "transaction fee payer is not this wallet",
            ));
        }

        if !self.approver.approve_transaction(&request).await {
            return Err(WalletError::UserRejected);
        }

        let recent_blockhash = tx.message.recent_blockhash;
        tx.try_sign(&[&self.keypair], recent_blockhash)
            .map_err(|err| WalletError::provider(err.to_string()))?;

        #[cfg(feature = "tracing")]
        debug!(signature = %tx.signatures[0], "Signed transaction");

        Ok(tx)
    }
}
