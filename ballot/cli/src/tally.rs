use {
    crate::{app::App, prompt::confirm},
    ballot_store::spawn_perturbation,
    ballot_types::{Presenter, UiEvent},
    clap::Parser,
    colored::Colorize,
};

#[derive(Parser)]
pub struct TallyCmd {
    /// Replace the tally with freshly seeded counts
    #[arg(long)]
    reset: bool,

    /// Skip confirmation
    #[arg(long, short)]
    yes: bool,
}

impl TallyCmd {
    pub fn run(self, app: &App, presenter: Presenter) -> anyhow::Result<()> {
        let store = app.store();

        let tally = if self.reset {
            if !self.yes && !confirm("🚨 Discard the local tally and reseed it?".bold())? {
                return Ok(());
            }

            store.reset()?
        } else {
            store.load()?
        };

        presenter.emit(UiEvent::Tally(tally.views()));

        Ok(())
    }
}

#[derive(Parser)]
pub struct WatchCmd {
    /// Simulate other voters even if disabled in the config
    #[arg(long)]
    simulate: bool,
}

impl WatchCmd {
    pub async fn run(self, app: &App, presenter: Presenter) -> anyhow::Result<()> {
        let store = app.store();
        let tally = store.load()?;

        presenter.emit(UiEvent::Tally(tally.views()));

        if !(app.cfg.perturbation.enabled || self.simulate) {
            println!(
                "{}",
                "Simulated voters are disabled; set `perturbation.enabled` or pass --simulate"
                    .yellow()
            );
            return Ok(());
        }

        let Some(handle) = spawn_perturbation(store, app.cfg.perturbation.strategy(), presenter)
        else {
            println!("{}", "Perturbation is configured to never fire, nothing to watch".yellow());
            return Ok(());
        };

        println!("{}", "Watching the tally, press Ctrl-C to stop".dimmed());

        tokio::signal::ctrl_c().await?;

        handle.abort();
        // Wait for the task to be dropped so its presenter is released.
        let _ = handle.await;

        Ok(())
    }
}
