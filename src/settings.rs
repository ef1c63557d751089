use crate::entity::MintError;
use crate::interactor::WorkflowConfig;
use crate::presenter::RefreshPolicy;
use crate::solana::client::parse_commitment;
use crate::solana::tokens::DEFAULT_METADATA_URI;
use crate::solana::{keypair_from_base58, keypair_from_json_file};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use solana_sdk::signature::Keypair;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE: &str = "onlymint";
const ENV_PREFIX: &str = "ONLYMINT";
/// Accepted in place of `ONLYMINT_INDEXER_URL`.
pub const HELIUS_URL_ENV: &str = "HELIUS_RPC_URL";
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Application settings, layered from defaults, `onlymint.toml` and
/// `ONLYMINT_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Helius RPC endpoint used for token listings and metadata
    pub indexer_url: String,
    pub rpc_url: String,
    pub commitment: String,
    pub confirm_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub refresh_delay_ms: u64,
    pub delayed_refresh_passes: u32,
    pub metadata_uri: String,
    /// Base58 secret key; takes precedence over `wallet_keypair_path`
    pub wallet_keypair: Option<String>,
    pub wallet_keypair_path: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Result<Self, MintError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        Self::from_builder(builder, env::var(HELIUS_URL_ENV).ok())
    }

    /// Apply defaults under `builder` and validate the result. `helius_url`
    /// only fills `indexer_url` when no other source sets it.
    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        helius_url: Option<String>,
    ) -> Result<Self, MintError> {
        let builder = builder
            .set_default("indexer_url", helius_url.unwrap_or_default())
            .and_then(|b| b.set_default("rpc_url", DEFAULT_RPC_URL))
            .and_then(|b| b.set_default("commitment", "confirmed"))
            .and_then(|b| b.set_default("confirm_timeout_secs", 60))
            .and_then(|b| b.set_default("poll_interval_ms", 500))
            .and_then(|b| b.set_default("refresh_delay_ms", 3000))
            .and_then(|b| b.set_default("delayed_refresh_passes", 1))
            .and_then(|b| b.set_default("metadata_uri", DEFAULT_METADATA_URI))
            .map_err(config_error)?;

        let settings: Settings = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error)?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), MintError> {
        if self.indexer_url.trim().is_empty() {
            return Err(MintError::Configuration(
                "Helius RPC URL not found in environment variables.".to_string(),
            ));
        }
        parse_commitment(&self.commitment).map_err(config_error)?;
        if self.confirm_timeout_secs == 0 {
            return Err(MintError::Configuration(
                "confirm_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(MintError::Configuration(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn workflow_config(&self) -> Result<WorkflowConfig, MintError> {
        Ok(WorkflowConfig {
            commitment: parse_commitment(&self.commitment).map_err(config_error)?,
            confirm_timeout: Duration::from_secs(self.confirm_timeout_secs),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            delay: Duration::from_millis(self.refresh_delay_ms),
            delayed_passes: self.delayed_refresh_passes,
        }
    }

    /// The configured keypair, falling back to the Solana CLI default
    /// `~/.config/solana/id.json`.
    pub fn load_wallet_keypair(&self) -> Result<Keypair, MintError> {
        if let Some(secret) = &self.wallet_keypair {
            return keypair_from_base58(secret).map_err(config_error);
        }

        let path = match &self.wallet_keypair_path {
            Some(path) => path.clone(),
            None => default_keypair_path().ok_or_else(|| {
                MintError::Configuration("Wallet keypair not configured".to_string())
            })?,
        };
        keypair_from_json_file(&path).map_err(config_error)
    }
}

fn default_keypair_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/solana/id.json"))
}

fn config_error(err: impl std::fmt::Display) -> MintError {
    MintError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana::wallet::keypair_to_base58;
    use config::FileFormat;
    use solana_sdk::signer::Signer;

    fn from_toml(toml: &str, helius_url: Option<&str>) -> Result<Settings, MintError> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Settings::from_builder(builder, helius_url.map(str::to_string))
    }

    #[test]
    fn missing_indexer_url_is_fatal() {
        let err = from_toml("", None).unwrap_err();
        assert_eq!(
            err,
            MintError::Configuration("Helius RPC URL not found in environment variables.".into())
        );
    }

    #[test]
    fn defaults_apply() {
        let settings = from_toml("", Some("https://devnet.helius-rpc.com/?api-key=k")).unwrap();
        assert_eq!(settings.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(settings.metadata_uri, DEFAULT_METADATA_URI);
        assert_eq!(settings.refresh_policy(), RefreshPolicy::default());
        assert_eq!(settings.poll_interval(), Duration::from_millis(500));

        let workflow = settings.workflow_config().unwrap();
        assert_eq!(workflow.confirm_timeout, Duration::from_secs(60));
    }

    #[test]
    fn file_values_win_over_alias() {
        let toml = r#"
            indexer_url = "https://indexer.example"
            refresh_delay_ms = 10
            delayed_refresh_passes = 3
        "#;
        let settings = from_toml(toml, Some("https://alias.example")).unwrap();
        assert_eq!(settings.indexer_url, "https://indexer.example");
        assert_eq!(settings.refresh_policy().delayed_passes, 3);
        assert_eq!(settings.refresh_policy().delay, Duration::from_millis(10));
    }

    #[test]
    fn unknown_commitment_is_rejected() {
        let toml = r#"
            indexer_url = "https://indexer.example"
            commitment = "eventually"
        "#;
        assert!(matches!(
            from_toml(toml, None),
            Err(MintError::Configuration(_))
        ));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let toml = r#"
            indexer_url = "https://indexer.example"
            poll_interval_ms = 0
        "#;
        assert_eq!(
            from_toml(toml, None).unwrap_err(),
            MintError::Configuration("poll_interval_ms must be greater than zero".into())
        );
    }

    #[test]
    fn base58_wallet_keypair() {
        let keypair = Keypair::new();
        let toml = format!(
            "indexer_url = \"https://indexer.example\"\nwallet_keypair = \"{}\"",
            keypair_to_base58(&keypair)
        );
        let settings = from_toml(&toml, None).unwrap();
        assert_eq!(settings.load_wallet_keypair().unwrap().pubkey(), keypair.pubkey());
    }
}
