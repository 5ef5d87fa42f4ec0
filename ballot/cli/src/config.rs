use {
    anyhow::ensure,
    ballot_client::ClientOptions,
    ballot_flow::FlowOptions,
    ballot_store::RandomPerturbation,
    ballot_types::{CommitmentLevel, SubmitOptions},
    serde::{Deserialize, Serialize},
    std::{path::PathBuf, time::Duration},
};

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    pub rpc: RpcConfig,
    pub wallet: WalletConfig,
    pub store: StoreConfig,
    pub perturbation: PerturbationConfig,
    pub sentry: SentryConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            wallet: WalletConfig::default(),
            store: StoreConfig::default(),
            perturbation: PerturbationConfig::default(),
            sentry: SentryConfig::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Reject values that would stall or abort a command halfway through.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.rpc.endpoints.is_empty(), "`rpc.endpoints` must not be empty");
        ensure!(self.rpc.poll_interval_ms > 0, "`rpc.poll_interval_ms` must be positive");
        ensure!(
            self.rpc.request_timeout_secs > 0,
            "`rpc.request_timeout_secs` must be positive"
        );
        ensure!(
            self.rpc.confirm_timeout_secs > 0,
            "`rpc.confirm_timeout_secs` must be positive"
        );
        ensure!(
            self.perturbation.interval_secs > 0,
            "`perturbation.interval_secs` must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&self.perturbation.probability),
            "`perturbation.probability` must be between 0 and 1, got {}",
            self.perturbation.probability
        );

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct RpcConfig {
    /// Tried in order; the first one that answers is used.
    pub endpoints: Vec<String>,
    pub commitment: CommitmentLevel,
    pub skip_preflight: bool,
    pub request_timeout_secs: u64,
    pub confirm_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["https://api.devnet.solana.com".to_string()],
            commitment: CommitmentLevel::Confirmed,
            skip_preflight: false,
            request_timeout_secs: 10,
            confirm_timeout_secs: 60,
            poll_interval_ms: 500,
        }
    }
}

impl RpcConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            confirm_timeout: Duration::from_secs(self.confirm_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions {
            commitment: self.commitment,
            submit: SubmitOptions {
                skip_preflight: self.skip_preflight,
                preflight_commitment: self.commitment,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct WalletConfig {
    /// Name of the keystore file under the keys directory, without extension.
    pub keystore: String,
    /// Overrides the keys directory lookup when set.
    pub keystore_path: Option<PathBuf>,
    /// The origin the wallet is asked to trust.
    pub origin: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keystore: "default".to_string(),
            keystore_path: None,
            origin: "ballot-cli".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Where the tally is persisted [default: <home>/data]
    pub data_dir: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct PerturbationConfig {
    pub enabled: bool,
    pub probability: f64,
    pub interval_secs: u64,
}

impl Default for PerturbationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            probability: RandomPerturbation::DEFAULT_PROBABILITY,
            interval_secs: RandomPerturbation::DEFAULT_INTERVAL.as_secs(),
        }
    }
}

impl PerturbationConfig {
    pub fn strategy(&self) -> RandomPerturbation {
        RandomPerturbation::new(self.probability, Duration::from_secs(self.interval_secs))
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct SentryConfig {
    pub enabled: bool,
    pub dsn: String,
    pub environment: String,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

// ----------------------------------- tests -----------------------------------
