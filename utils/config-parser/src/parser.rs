use {
    crate::Error,
    config::{Config, Environment, File},
    serde::de::DeserializeOwned,
    std::path::Path,
};

/// Environment variables overriding file values start with this prefix, e.g.
/// `BALLOT_RPC__CONFIRM_TIMEOUT_SECS=30` sets `rpc.confirm_timeout_secs`.
pub const DEFAULT_ENV_PREFIX: &str = "BALLOT";

/// Loads a TOML file, if present, and overlays `__`-separated environment
/// variables on top.
#[derive(Debug, Clone)]
pub struct ConfigParser {
    env_prefix: String,
    list_keys: Vec<String>,
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            list_keys: vec![],
        }
    }
}

impl ConfigParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_prefix<P>(mut self, prefix: P) -> Self
    where
        P: Into<String>,
    {
        self.env_prefix = prefix.into();
        self
    }

    /// Parse the environment value of `key` (dotted, lowercase) as a
    /// comma-separated list.
    pub fn with_list_key<K>(mut self, key: K) -> Self
    where
        K: Into<String>,
    {
        self.list_keys.push(key.into());
        self
    }

    pub fn parse<P, D>(&self, path: P) -> Result<D, Error>
    where
        P: AsRef<Path>,
        D: DeserializeOwned,
    {
        let mut env_override = Environment::with_prefix(&self.env_prefix)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        if !self.list_keys.is_empty() {
            env_override = env_override.list_separator(",");
            for key in &self.list_keys {
                env_override = env_override.with_list_parse_key(key);
            }
        }

        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(env_override)
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

/// Parse the config file at `path` with the default settings. A missing file
/// is not an error; every field the file doesn't set keeps its default.
pub fn parse_config<P, D>(path: P) -> Result<D, Error>
where
    P: AsRef<Path>,
    D: DeserializeOwned,
{
    ConfigParser::new().parse(path)
}

#[cfg(test)]
mod tests {
    use {super::*, assertor::*, serde::Deserialize};

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct TestSettings {
        log_level: String,
        rpc: Rpc,
        wallet: Wallet,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Rpc {
        endpoints: Vec<String>,
        confirm_timeout_secs: u64,
    }

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Wallet {
        origin: String,
    }

    #[test]
    fn file_values() {
        let config: TestSettings = ConfigParser::new()
            .with_env_prefix("BALLOT_TEST_FILE")
            .parse("fixtures/config_test1.toml")
            .expect("Failed to parse file");

        assert_that!(config.log_level.as_str()).is_equal_to("info");
        assert_that!(config.rpc.endpoints).is_equal_to(vec![
            "https://api.devnet.solana.com".to_string(),
        ]);
        assert_that!(config.wallet.origin.as_str()).is_equal_to("ballot-cli");
    }

    #[test]
    fn environment_overrides_file() {
        std::env::set_var("BALLOT_TEST_ENV_RPC__CONFIRM_TIMEOUT_SECS", "5");
        std::env::set_var(
            "BALLOT_TEST_ENV_RPC__ENDPOINTS",
            "http://127.0.0.1:8899,https://api.devnet.solana.com",
        );

        let config: TestSettings = ConfigParser::new()
            .with_env_prefix("BALLOT_TEST_ENV")
            .with_list_key("rpc.endpoints")
            .parse("fixtures/config_test1.toml")
            .expect("Failed to parse file");

        assert_that!(config.rpc.confirm_timeout_secs).is_equal_to(5);
        assert_that!(config.rpc.endpoints).is_equal_to(vec![
            "http://127.0.0.1:8899".to_string(),
            "https://api.devnet.solana.com".to_string(),
        ]);
        assert_that!(config.wallet.origin.as_str()).is_equal_to("ballot-cli");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config: TestSettings = ConfigParser::new()
            .with_env_prefix("BALLOT_TEST_MISSING")
            .parse("fixtures/does_not_exist.toml")
            .expect("Failed to parse file");

        assert_that!(config.rpc.endpoints).is_empty();
        assert_that!(config.log_level.as_str()).is_equal_to("");
    }
}
