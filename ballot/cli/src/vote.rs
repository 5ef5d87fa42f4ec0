use {
    crate::{app::App, approver::TerminalApprover},
    anyhow::ensure,
    ballot_flow::VoteTransactionFlow,
    ballot_types::{Presenter, UiEvent, VoteOption},
    ballot_wallet::WalletSession,
    clap::Parser,
};

#[derive(Parser)]
pub struct VoteCmd {
    /// The option to vote for: A, B, C or D
    option: VoteOption,

    /// Sign without asking for confirmation
    #[arg(long, short)]
    yes: bool,
}

impl VoteCmd {
    pub async fn run(self, app: &App, presenter: Presenter) -> anyhow::Result<()> {
        let (client, status) = app.client().await;

        if !status.is_ok() {
            presenter.emit(UiEvent::Diagnostics(status));
        }

        let wallet = app.wallet(TerminalApprover {
            auto_sign: self.yes,
        })?;

        // Only an already approved connection is used; `ballot connect` grants one.
        let session = WalletSession::new(wallet, presenter.clone());
        session.connect_trusted(client.as_ref()).await;

        let store = app.store();
        store.load()?;

        let flow = VoteTransactionFlow::new(session, client, store, presenter)
            .with_options(app.cfg.rpc.flow_options());

        let outcome = flow.cast_vote(self.option).await;

        ensure!(outcome.is_committed(), "vote for {} was not cast", self.option);

        Ok(())
    }
}
