#[cfg(feature = "tracing")]
use tracing::{error, info, warn};
use {
    crate::{AbortReason, VoteOutcome},
    ballot_store::{LocalTallyStore, Storage},
    ballot_types::{
        CommitmentLevel, ConfirmOutcome, FlowState, LedgerClient, LoadingGuard, Presenter, Severity,
        SignedTransaction, SubmitOptions, TransactionOutcome, UiEvent, VoteOption,
        VoteTransactionRequest, WALLET_INSTALL_URL, WalletProvider,
    },
    ballot_wallet::{INSTALL_LINK_DELAY, WalletSession},
    chrono::Utc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOptions {
    /// Used both for the blockhash and for confirmation.
    pub commitment: CommitmentLevel,
    pub submit: SubmitOptions,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            commitment: CommitmentLevel::Confirmed,
            submit: SubmitOptions::default(),
        }
    }
}

/// Turns a choice into a confirmed memo transaction, and counts it once it
/// is confirmed.
///
/// Concurrent `cast_vote` calls are neither serialized nor deduplicated; each
/// runs to its own outcome.
pub struct VoteTransactionFlow<W, C, S> {
    session: WalletSession<W>,
    client: Option<C>,
    store: LocalTallyStore<S>,
    presenter: Presenter,
    options: FlowOptions,
}

impl<W, C, S> VoteTransactionFlow<W, C, S>
where
    W: WalletProvider + Send + Sync,
    C: LedgerClient + Send + Sync,
    S: Storage,
{
    pub fn new(
        session: WalletSession<W>,
        client: Option<C>,
        store: LocalTallyStore<S>,
        presenter: Presenter,
    ) -> Self {
        Self {
            session,
            client,
            store,
            presenter,
            options: FlowOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session(&self) -> &WalletSession<W> {
        &self.session
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    pub fn store(&self) -> &LocalTallyStore<S> {
        &self.store
    }

    /// Cast one vote. Never fails: every problem ends up as an
    /// [`AbortReason`], reported to the user exactly once.
    pub async fn cast_vote(&self, option: VoteOption) -> VoteOutcome {
        #[cfg(feature = "tracing")]
        info!(%option, "Casting vote");

        let outcome = self
            .run(option)
            .await
            .unwrap_or_else(VoteOutcome::Aborted);

        self.report(&outcome);

        outcome
    }

    fn enter(&self, state: FlowState) {
        self.presenter.emit(UiEvent::State(state));
    }

    async fn run(&self, option: VoteOption) -> Result<VoteOutcome, AbortReason> {
        let identity = self
            .session
            .current_identity()
            .ok_or(AbortReason::NoWallet)?;
        let client = self.client.as_ref().ok_or(AbortReason::NoConnection)?;

        let loading = self.presenter.loading("Creating transaction...");
        self.enter(FlowState::BuildingTx);

        loading.update("Getting latest blockhash...");
        let (blockhash, last_valid_block_height) = client
            .get_latest_blockhash(self.options.commitment)
            .await
            .map_err(|err| AbortReason::NetworkError(err.to_string()))?;

        let request = VoteTransactionRequest::new(
            option,
            identity.address,
            blockhash,
            last_valid_block_height,
            Utc::now(),
        );

        self.enter(FlowState::AwaitingSignature);
        loading.update("Please approve in wallet...");
        let signed = self
            .session
            .sign_transaction(request.unsigned_transaction())
            .await
            .map_err(AbortReason::from_wallet)?;
        let signed = SignedTransaction::new(signed).map_err(|err| {
            AbortReason::Wallet(format!("wallet returned an unencodable transaction: {err}"))
        })?;

        if !signed.is_fully_signed() {
            return Err(AbortReason::Wallet(
                "wallet returned an unsigned transaction".to_string(),
            ));
        }

        let signature = match self
            .submit_and_confirm(client, &request, &signed, &loading)
            .await
        {
            TransactionOutcome::Confirmed(signature) => signature,
            TransactionOutcome::Rejected(err) => return Err(AbortReason::from_submit(err)),
            TransactionOutcome::Failed(reason) => return Err(AbortReason::OnChainError(reason)),
        };

        // The only place the tally changes.
        let tally = self.store.increment(option).map_err(|err| {
            #[cfg(feature = "tracing")]
            error!(%signature, %err, "Vote confirmed on chain but not counted locally");

            AbortReason::Storage(err.to_string())
        })?;

        Ok(VoteOutcome::Committed {
            option,
            signature,
            tally,
        })
    }

    /// Send the signed transaction and wait for it to reach the configured
    /// commitment.
    pub async fn submit_and_confirm(
        &self,
        client: &C,
        request: &VoteTransactionRequest,
        signed: &SignedTransaction,
        loading: &LoadingGuard<'_>,
    ) -> TransactionOutcome {
        self.enter(FlowState::Submitting);
        loading.update("Sending transaction...");

        let signature = match client.submit(signed, self.options.submit).await {
            Ok(signature) => signature,
            Err(err) => return TransactionOutcome::Rejected(err),
        };

        #[cfg(feature = "tracing")]
        info!(%signature, "Transaction sent");

        self.enter(FlowState::AwaitingConfirmation);
        loading.update("Confirming transaction...");

        match client
            .confirm(
                &signature,
                &request.recent_blockhash,
                request.last_valid_block_height,
                self.options.commitment,
            )
            .await
        {
            ConfirmOutcome::Confirmed => TransactionOutcome::Confirmed(signature),
            ConfirmOutcome::Failed(reason) => TransactionOutcome::Failed(reason),
        }
    }

    fn report(&self, outcome: &VoteOutcome) {
        match outcome {
            VoteOutcome::Committed {
                option,
                signature,
                tally,
            } => {
                #[cfg(feature = "tracing")]
                info!(%option, %signature, "Vote committed");

                self.enter(FlowState::Committed);
                self.presenter.emit(UiEvent::Voted {
                    option: *option,
                    signature: *signature,
                });
                self.presenter.emit(UiEvent::Tally(tally.views()));

                let signature = signature.to_string();
                self.presenter.toast(
                    format!(
                        "Vote cast successfully! Transaction: {}...",
                        &signature[..signature.len().min(8)]
                    ),
                    Severity::Success,
                );
            },
            VoteOutcome::Aborted(reason) => {
                #[cfg(feature = "tracing")]
                warn!(?reason, "Vote aborted");

                self.enter(FlowState::Aborted);
                self.presenter.toast(reason.message(), reason.severity());

                if *reason == AbortReason::WalletNotFound {
                    self.presenter.emit(UiEvent::ExternalLink {
                        url: WALLET_INSTALL_URL.to_string(),
                        delay: INSTALL_LINK_DELAY,
                    });
                }
            },
        }
    }
}
