use alloy::primitives::Address;
use config::{Config, Environment, File, FileFormat};
use oft_chains::parse_address;
use oft_contracts::{ArtifactError, TokenArtifact};
use oft_models::ChainConfig;
use secrecy::SecretString;
use serde::Deserialize;
use snafu::{ResultExt, Snafu};
use std::{collections::BTreeMap, path::PathBuf};
use tracing::{info, warn};

use crate::ConfigArgs;

const ENV_PREFIX: &str = "OFT";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    #[snafu(display("Failed to load chain config from {}: {}", path.display(), source))]
    Load {
        path: PathBuf,
        source: config::ConfigError,
    },

    #[snafu(display("Chain '{chain}' is misconfigured: {message}"))]
    InvalidChain { chain: String, message: String },

    #[snafu(display("Invalid default owner: {source}"))]
    DefaultOwner { source: oft_chains::Error },

    #[snafu(display("{source}"))]
    Artifact { source: ArtifactError },
}

type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
struct ChainSettings {
    rpc_url: String,
    chain_id: u64,
    endpoint_address: Address,
    eid: u32,
    #[serde(default)]
    factory_address: Option<Address>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    #[serde(default)]
    chains: BTreeMap<String, ChainSettings>,
}

/// Everything the process needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub chains: Vec<ChainConfig>,
    pub private_key: SecretString,
    pub default_owner: Option<Address>,
    pub token_artifact: Option<TokenArtifact>,
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

/// Reads the chain table from `--config`, then applies `OFT__CHAINS__<NAME>__<FIELD>` overrides.
pub fn load_config(args: &ConfigArgs) -> Result<AppConfig> {
    load_with_environment(args, environment())
}

fn load_with_environment(args: &ConfigArgs, environment: Environment) -> Result<AppConfig> {
    let path = &args.config_file;
    if !path.exists() {
        warn!(
            "Config file {} not found, reading chains from the environment only",
            path.display()
        );
    }

    let settings: FileSettings = Config::builder()
        .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false))
        .add_source(environment)
        .build()
        .and_then(Config::try_deserialize)
        .context(LoadSnafu { path })?;

    let chains = settings
        .chains
        .into_iter()
        .map(|(name, chain)| into_chain_config(name, chain))
        .collect::<Result<Vec<_>>>()?;

    let default_owner = args
        .default_owner
        .as_deref()
        .map(parse_address)
        .transpose()
        .context(DefaultOwnerSnafu)?;

    let token_artifact = match &args.token_artifact {
        Some(path) => {
            let artifact = TokenArtifact::load(path).context(ArtifactSnafu)?;
            if artifact.is_none() {
                warn!(
                    "Token artifact {} holds no bytecode, deployments are disabled",
                    path.display()
                );
            }
            artifact
        }
        None => {
            warn!("No token artifact configured, deployments are disabled");
            None
        }
    };

    info!("Loaded {} chain(s) from configuration", chains.len());
    Ok(AppConfig {
        chains,
        private_key: args.private_key.clone(),
        default_owner,
        token_artifact,
    })
}

fn into_chain_config(name: String, chain: ChainSettings) -> Result<ChainConfig> {
    if chain.rpc_url.trim().is_empty() {
        return InvalidChainSnafu {
            chain: name,
            message: "rpc_url is empty",
        }
        .fail();
    }
    if chain.eid == 0 {
        return InvalidChainSnafu {
            chain: name,
            message: "eid must be non-zero",
        }
        .fail();
    }

    Ok(ChainConfig {
        name,
        rpc_url: chain.rpc_url,
        chain_id: chain.chain_id,
        endpoint_address: chain.endpoint_address,
        eid: chain.eid,
        factory_address: chain.factory_address,
    })
}
