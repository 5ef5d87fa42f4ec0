use {
    crate::{
        app::App,
        approver::TerminalApprover,
        render::{render, render_identity, render_tally},
    },
    ballot_types::{LedgerClient, Presenter, UiEvent, WalletIdentity, lamports_to_sol},
    ballot_wallet::{Keystore, WalletSession},
    colored::Colorize,
    tracing::warn,
};

/// Approve this client in the wallet and show the connected address.
pub async fn connect(app: &App, presenter: Presenter) -> anyhow::Result<()> {
    let (client, status) = app.client().await;
    presenter.emit(UiEvent::Diagnostics(status));

    let wallet = app.wallet(TerminalApprover::default())?;
    let session = WalletSession::new(wallet, presenter);

    session.connect(client.as_ref()).await?;

    Ok(())
}

/// Forget the approval, so the next connection asks again.
pub fn disconnect(app: &App) -> anyhow::Result<()> {
    let origin = &app.cfg.wallet.origin;

    if app.trusted_origins()?.revoke(origin)? {
        println!("👛 Disconnected `{origin}`");
    } else {
        println!("`{origin}` was not connected");
    }

    Ok(())
}

/// Print the endpoint, the configured key and the local tally, without
/// unlocking the keystore.
pub async fn status(app: &App) -> anyhow::Result<()> {
    println!("{} {}", "Home:".bold(), app.dir.home().display());

    let (client, status) = app.client().await;

    if let Some(client) = &client {
        println!("{} {}", "Endpoint:".bold(), client.endpoint());
    }

    if let Some(line) = render(&UiEvent::Diagnostics(status)) {
        println!("{line}");
    }

    let filename = app.keystore_file();

    if filename.exists() {
        let keystore = Keystore::read(&filename)?;
        let mut identity = WalletIdentity::new(keystore.pubkey);

        if let Some(client) = &client {
            match client.get_balance(&keystore.pubkey).await {
                Ok(lamports) => identity = identity.with_balance(lamports_to_sol(lamports)),
                Err(err) => warn!(%err, "Failed to get balance"),
            }
        }

        let connected = app.trusted_origins()?.contains(&app.cfg.wallet.origin);

        println!(
            "{} {}",
            render_identity(&identity),
            if connected {
                "connected".green()
            } else {
                "not connected".yellow()
            }
        );
    } else {
        println!("👛 No key yet, create one with `ballot keys add`");
    }

    let tally = app.store().load()?;
    println!("\n{}", render_tally(&tally.views()));

    Ok(())
}
