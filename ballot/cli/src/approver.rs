use {
    crate::prompt::confirm,
    async_trait::async_trait,
    ballot_types::Pubkey,
    ballot_wallet::{Approver, SignatureRequest},
    colored::Colorize,
    tracing::warn,
};

/// Asks on the terminal before connecting or signing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalApprover {
    /// Sign without asking. Connections are still confirmed.
    pub auto_sign: bool,
}

impl TerminalApprover {
    async fn ask(prompt: String) -> bool {
        // Let the renderer print pending events before the prompt takes over.
        tokio::task::yield_now().await;

        // dialoguer blocks on stdin.
        match tokio::task::spawn_blocking(move || confirm(prompt)).await {
            Ok(Ok(approved)) => approved,
            Ok(Err(err)) => {
                warn!(%err, "Failed to read confirmation");
                false
            },
            Err(err) => {
                warn!(%err, "Confirmation prompt panicked");
                false
            },
        }
    }
}

#[async_trait]
impl Approver for TerminalApprover {
    async fn approve_connection(&self, origin: &str, pubkey: &Pubkey) -> bool {
        let prompt = format!("🔗 Allow `{origin}` to see your address {pubkey}?");

        Self::ask(prompt.bold().to_string()).await
    }

    async fn approve_transaction(&self, request: &SignatureRequest) -> bool {
        if self.auto_sign {
            return true;
        }

        tokio::task::yield_now().await;
        println!("{}", describe(request));

        Self::ask("✍️  Sign this transaction?".bold().to_string()).await
    }
}

/// Multi-line summary of what is about to be signed.
pub fn describe(request: &SignatureRequest) -> String {
    let mut lines = vec![format!("{} {}", "Requested by:".bold(), request.origin)];

    match request.fee_payer {
        Some(fee_payer) => lines.push(format!("{} {fee_payer}", "Fee payer:".bold())),
        None => lines.push(format!("{} {}", "Fee payer:".bold(), "none".red())),
    }

    lines.push(format!("{} {}", "Blockhash:".bold(), request.recent_blockhash));

    for memo in &request.memos {
        lines.push(format!("{} {memo}", "Memo:".bold()));
    }

    if request.other_instructions > 0 {
        lines.push(
            format!("⚠️  {} other instruction(s)", request.other_instructions)
                .yellow()
                .to_string(),
        );
    }

    lines.join("\n")
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        ballot_types::{Hash, VoteOption, VoteTransactionRequest},
        std::time::{Duration, UNIX_EPOCH},
    };

    #[test]
    fn describes_a_vote() {
        let fee_payer = Pubkey::new_unique();
        let now = (UNIX_EPOCH + Duration::from_secs(1_700_000_000)).into();
        let tx = VoteTransactionRequest::new(VoteOption::C, fee_payer, Hash::new_unique(), 7, now)
            .unsigned_transaction();

        let summary = describe(&SignatureRequest::new("ballot-cli", &tx));

        assert!(summary.contains("ballot-cli"));
        assert!(summary.contains(&fee_payer.to_string()));
        assert!(summary.contains("Vote for option 3 - 1700000000000000"));
        assert!(!summary.contains("other instruction"));
    }

    #[tokio::test]
    async fn auto_sign_skips_the_prompt() {
        let tx = VoteTransactionRequest::new(
            VoteOption::A,
            Pubkey::new_unique(),
            Hash::new_unique(),
            7,
            UNIX_EPOCH.into(),
        )
        .unsigned_transaction();

        let approver = TerminalApprover { auto_sign: true };

        assert!(
            approver
                .approve_transaction(&SignatureRequest::new("ballot-cli", &tx))
                .await
        );
    }
}
