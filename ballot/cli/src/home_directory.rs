use {
    anyhow::anyhow,
    home::home_dir,
    std::path::{Path, PathBuf},
};

// relative to user home directory (~)
const DEFAULT_APP_DIR: &str = ".ballot";

/// Where the client keeps its config, keys and local data.
pub struct HomeDirectory {
    home: PathBuf,
}

impl HomeDirectory {
    pub fn new(home: PathBuf) -> Self {
        Self { home }
    }

    /// Use `home` if given, `~/.ballot` otherwise.
    pub fn new_or_default(home: Option<PathBuf>) -> anyhow::Result<Self> {
        let home = match home {
            Some(home) => home,
            None => home_dir()
                .ok_or(anyhow!("Failed to find home directory"))?
                .join(DEFAULT_APP_DIR),
        };

        Ok(Self::new(home))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Used for the local tally.
    pub fn data_dir(&self) -> PathBuf {
        self.home.join("data")
    }

    /// Used for keystores.
    pub fn keys_dir(&self) -> PathBuf {
        self.home.join("keys")
    }

    /// Origins the keystore wallet has been allowed to connect from.
    pub fn trusted_origins_file(&self) -> PathBuf {
        self.home.join("wallet").join("trusted.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join("app.toml")
    }
}
