use {
    ballot_types::{Loading, ProbeStatus, Severity, TallyView, UiEvent, WalletIdentity},
    colored::Colorize,
    tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle},
    tracing::debug,
};

const BAR_WIDTH: usize = 20;

/// Print every event until all presenters are dropped.
pub fn spawn_renderer(mut events: UnboundedReceiver<UiEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let UiEvent::ExternalLink { delay, .. } = &event {
                tokio::time::sleep(*delay).await;
            }

            if let Some(line) = render(&event) {
                println!("{line}");
            }
        }
    })
}

pub fn render(event: &UiEvent) -> Option<String> {
    match event {
        UiEvent::Toast { message, severity } => Some(match severity {
            Severity::Success => format!("✅ {message}").green().to_string(),
            Severity::Warning => format!("⚠️  {message}").yellow().to_string(),
            Severity::Error => format!("❌ {message}").red().to_string(),
        }),
        UiEvent::Loading(Loading::Show(label)) => Some(format!("⏳ {label}").dimmed().to_string()),
        UiEvent::Loading(Loading::Hide) => None,
        UiEvent::Tally(views) => Some(render_tally(views)),
        UiEvent::State(state) => {
            debug!(%state, "Vote flow state");
            None
        },
        UiEvent::Voted { option, signature } => {
            Some(format!(
                "🗳️  Voted for {} in transaction {signature}",
                option.to_string().bold()
            ))
        },
        UiEvent::Identity(Some(identity)) => Some(render_identity(identity)),
        UiEvent::Identity(None) => Some("👛 Disconnected".to_string()),
        UiEvent::ExternalLink { url, .. } => Some(format!("🔗 {}", url.underline())),
        UiEvent::Diagnostics(ProbeStatus::Ok { version }) => {
            Some(format!("🌐 Solana node {version}").green().to_string())
        },
        UiEvent::Diagnostics(ProbeStatus::Degraded { reason }) => {
            Some(format!("🌐 RPC endpoint degraded: {reason}").yellow().to_string())
        },
    }
}

pub fn render_identity(identity: &WalletIdentity) -> String {
    let balance = match identity.balance {
        Some(balance) => format!("{balance:.4} SOL"),
        None => "balance unknown".to_string(),
    };

    format!("👛 {} ({balance})", identity.short_address().bold())
}

pub fn render_tally(views: &[TallyView]) -> String {
    views
        .iter()
        .map(|view| {
            let filled = ((view.percentage / 100.0 * BAR_WIDTH as f64).round() as usize)
                .min(BAR_WIDTH);

            format!(
                "{}  {}{}  {:>6}  {}",
                view.option.to_string().bold(),
                "█".repeat(filled).cyan(),
                "░".repeat(BAR_WIDTH - filled).dimmed(),
                view.percentage_label(),
                view.count_label(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ----------------------------------- tests -----------------------------------
