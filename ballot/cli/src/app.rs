use {
    crate::{approver::TerminalApprover, config::Config, home_directory::HomeDirectory, prompt},
    anyhow::Context,
    ballot_client::{RpcClient, connect_any},
    ballot_store::{FileStorage, LocalTallyStore},
    ballot_types::ProbeStatus,
    ballot_wallet::{Keystore, KeystoreWallet, TrustedOrigins},
    colored::Colorize,
    std::path::PathBuf,
    tracing::warn,
};

/// Everything a command needs from the environment.
pub struct App {
    pub dir: HomeDirectory,
    pub cfg: Config,
}

impl App {
    pub fn new(dir: HomeDirectory, cfg: Config) -> Self {
        Self { dir, cfg }
    }

    pub fn keystore_file(&self) -> PathBuf {
        self.cfg.wallet.keystore_path.clone().unwrap_or_else(|| {
            self.dir
                .keys_dir()
                .join(format!("{}.json", self.cfg.wallet.keystore))
        })
    }

    pub fn trusted_origins(&self) -> anyhow::Result<TrustedOrigins> {
        Ok(TrustedOrigins::load(self.dir.trusted_origins_file())?)
    }

    pub fn store(&self) -> LocalTallyStore<FileStorage> {
        let data_dir = self
            .cfg
            .store
            .data_dir
            .clone()
            .unwrap_or_else(|| self.dir.data_dir());

        LocalTallyStore::new(FileStorage::new(data_dir))
    }

    /// A client for the first healthy endpoint. `None` only if no endpoint is
    /// configured correctly, in which case votes fail with no connection.
    pub async fn client(&self) -> (Option<RpcClient>, ProbeStatus) {
        match connect_any(&self.cfg.rpc.endpoints, self.cfg.rpc.client_options()).await {
            Ok((client, status)) => (Some(client), status),
            Err(err) => {
                warn!(%err, "No usable RPC endpoint");
                (None, ProbeStatus::Degraded {
                    reason: err.to_string(),
                })
            },
        }
    }

    /// Unlock the keystore. `None` if there is no keystore yet, which the
    /// session reports as a missing wallet.
    pub fn wallet(
        &self,
        approver: TerminalApprover,
    ) -> anyhow::Result<Option<KeystoreWallet<TerminalApprover>>> {
        let filename = self.keystore_file();

        if !filename.exists() {
            println!(
                "{}",
                format!("No key at {filename:?}, create one with `ballot keys add`").yellow()
            );
            return Ok(None);
        }

        let password = prompt::read_password(format!("🔑 Password for {filename:?}").bold())?;
        let seed = Keystore::from_file(&filename, password)
            .with_context(|| format!("failed to unlock {filename:?}, wrong password?"))?;

        let wallet =
            KeystoreWallet::new(&seed, &self.cfg.wallet.origin, self.trusted_origins()?, approver)?;

        Ok(Some(wallet))
    }
}
