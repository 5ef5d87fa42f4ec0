use {
    sentry::integrations::tracing::layer as sentry_layer,
    tracing_subscriber::{EnvFilter, fmt, prelude::*, registry},
};

mod app;
mod approver;
mod config;
mod home_directory;
mod keys;
mod prompt;
mod render;
mod session;
mod tally;
mod vote;

use {
    crate::{
        app::App,
        config::Config,
        home_directory::HomeDirectory,
        keys::KeysCmd,
        render::spawn_renderer,
        tally::{TallyCmd, WatchCmd},
        vote::VoteCmd,
    },
    ballot_types::Presenter,
    clap::Parser,
    config_parser::ConfigParser,
    std::{io, path::PathBuf},
};

#[derive(Parser)]
#[command(author, version, about, next_display_order = None)]
struct Cli {
    /// Directory for config, keys and local data [default: ~/.ballot]
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Manage the wallet key
    #[command(subcommand, next_display_order = None)]
    Keys(KeysCmd),

    /// Approve this client in the wallet
    Connect,

    /// Revoke the wallet approval
    Disconnect,

    /// Show the RPC endpoint, the wallet and the tally
    Status,

    /// Cast a vote [alias: v]
    #[command(alias = "v")]
    Vote(VoteCmd),

    /// Show or reset the local tally
    Tally(TallyCmd),

    /// Follow the tally while simulated voters are active
    Watch(WatchCmd),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Find the home directory from the CLI `--home` flag.
    let app_dir = HomeDirectory::new_or_default(cli.home)?;

    // Parse the config file, with `BALLOT_*` environment overrides.
    let cfg: Config = ConfigParser::new()
        .with_list_key("rpc.endpoints")
        .parse(app_dir.config_file())?;

    cfg.validate()?;

    let filter = EnvFilter::try_new(&cfg.log_level)?;

    let _sentry_guard = if cfg.sentry.enabled {
        let guard = sentry::init((cfg.sentry.dsn.as_str(), sentry::ClientOptions {
            environment: Some(cfg.sentry.environment.clone().into()),
            release: sentry::release_name!(),
            sample_rate: cfg.sentry.sample_rate,
            traces_sample_rate: cfg.sentry.traces_sample_rate,
            ..Default::default()
        }));

        sentry::configure_scope(|scope| {
            scope.set_tag("origin", &cfg.wallet.origin);
        });

        registry()
            .with(fmt::layer().with_writer(io::stderr).with_filter(filter))
            .with(sentry_layer())
            .init();

        tracing::info!("Sentry initialized");

        Some(guard)
    } else {
        // Set up tracing.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();

        None
    };

    let (presenter, events) = Presenter::channel();
    let renderer = spawn_renderer(events);

    let result = run(cli.command, App::new(app_dir, cfg), presenter).await;

    // Every presenter is gone by now, so the renderer drains and exits.
    renderer.await?;

    result
}

async fn run(command: Command, app: App, presenter: Presenter) -> anyhow::Result<()> {
    match command {
        Command::Keys(cmd) => cmd.run(&app.keystore_file()),
        Command::Connect => session::connect(&app, presenter).await,
        Command::Disconnect => session::disconnect(&app),
        Command::Status => session::status(&app).await,
        Command::Vote(cmd) => cmd.run(&app, presenter).await,
        Command::Tally(cmd) => cmd.run(&app, presenter),
        Command::Watch(cmd) => cmd.run(&app, presenter).await,
    }
}
