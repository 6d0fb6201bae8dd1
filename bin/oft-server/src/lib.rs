use clap::{Args, Parser, Subcommand};
use oft_models::{BridgeRequest, DeploymentRequest, DEFAULT_DECIMALS};
use secrecy::SecretString;
use snafu::prelude::*;
use std::{convert::Infallible, net::IpAddr, path::PathBuf};

pub mod config;
pub mod error;
pub mod server;
pub mod tools;

pub use config::{load_config, AppConfig};
pub use server::{build_router, run_server, AppState};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to initialize logger: {source}"))]
    InitLogger { source: common::InitLoggerError },

    #[snafu(display("Configuration error: {source}"))]
    Configuration { source: crate::config::ConfigError },

    #[snafu(display("Invalid chain registry: {source}"))]
    Registry { source: oft_chains::Error },

    #[snafu(display("Failed to set up signer: {source}"))]
    Signer { source: oft_chains::Error },

    #[snafu(display("Failed to bind server"))]
    ServerBind { source: std::io::Error },

    #[snafu(display("Server failed to start"))]
    ServerStart { source: std::io::Error },

    #[snafu(display("Failed to encode tool response: {source}"))]
    Encode { source: serde_json::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn parse_secret(value: &str) -> std::result::Result<SecretString, Infallible> {
    Ok(SecretString::from(value.to_string()))
}

#[derive(Parser, Debug)]
#[command(name = "oft-server")]
#[command(about = "Deploys, peers and bridges LayerZero OFT tokens across EVM chains")]
pub struct OftServerArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Log level
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// TOML file holding the `[chains.<name>]` table
    #[arg(long = "config", env = "OFT_CONFIG", default_value = "oft-orchestrator.toml")]
    pub config_file: PathBuf,

    /// Hex private key used to sign on every chain
    #[arg(long, env = "OFT_PRIVATE_KEY", hide_env_values = true, value_parser = parse_secret)]
    pub private_key: SecretString,

    /// Owner of deployed tokens when a request names none (defaults to the signer)
    #[arg(long, env = "OFT_DEFAULT_OWNER")]
    pub default_owner: Option<String>,

    /// Compiled OFT bytecode, raw hex or a Foundry/Hardhat JSON artifact
    #[arg(long, env = "OFT_TOKEN_ARTIFACT")]
    pub token_artifact: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the tools over HTTP
    Serve(ServeArgs),
    /// Deploy and configure a token once, printing the report as JSON
    Deploy(DeployArgs),
    /// Bridge tokens once, printing the receipt as JSON
    Bridge(BridgeArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind to
    #[arg(short, long, default_value = "3030")]
    pub port: u16,

    /// CORS domain to allow (supports wildcards like "*.example.com")
    #[arg(long = "corsdomain", env = "CORS_DOMAIN")]
    pub cors_domain: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    #[arg(long)]
    pub token_name: String,

    #[arg(long)]
    pub token_symbol: String,

    /// Whole-token supply minted to the owner
    #[arg(long)]
    pub initial_total_supply: String,

    #[arg(long, default_value_t = DEFAULT_DECIMALS)]
    pub decimals: u8,

    /// Comma-separated chain names
    #[arg(long, value_delimiter = ',', required = true)]
    pub target_chains: Vec<String>,

    #[arg(long)]
    pub owner: Option<String>,
}

impl From<DeployArgs> for DeploymentRequest {
    fn from(args: DeployArgs) -> Self {
        DeploymentRequest {
            token_name: args.token_name,
            token_symbol: args.token_symbol,
            initial_total_supply: args.initial_total_supply,
            decimals: args.decimals,
            target_chains: args.target_chains,
            owner: args.owner,
        }
    }
}

#[derive(Args, Debug)]
pub struct BridgeArgs {
    #[arg(long)]
    pub token_address: String,

    /// Amount in whole tokens, scaled by 18 decimals
    #[arg(long)]
    pub amount: String,

    #[arg(long)]
    pub from_chain: String,

    #[arg(long)]
    pub to_chain: String,

    #[arg(long)]
    pub receiver_address: String,

    #[arg(long, default_value = "0x")]
    pub extra_options: String,
}

impl From<BridgeArgs> for BridgeRequest {
    fn from(args: BridgeArgs) -> Self {
        BridgeRequest {
            token_address: args.token_address,
            amount: args.amount,
            from_chain: args.from_chain,
            to_chain: args.to_chain,
            receiver_address: args.receiver_address,
            extra_options: args.extra_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_deploy_command() {
        let args = OftServerArgs::try_parse_from([
            "oft-server",
            "--private-key",
            KEY,
            "deploy",
            "--token-name",
            "Gamma",
            "--token-symbol",
            "GMA",
            "--initial-total-supply",
            "1000000",
            "--target-chains",
            "sepolia,arbitrum-sepolia",
        ])
        .unwrap();

        assert_eq!(args.config.private_key.expose_secret(), KEY);
        assert_eq!(
            args.config.config_file,
            PathBuf::from("oft-orchestrator.toml")
        );
        let Command::Deploy(deploy) = args.command else {
            panic!("expected deploy command");
        };
        let request = DeploymentRequest::from(deploy);
        assert_eq!(request.decimals, 18);
        assert_eq!(request.target_chains, vec!["sepolia", "arbitrum-sepolia"]);
        assert_eq!(request.owner, None);
    }

    #[test]
    fn test_parse_bridge_command() {
        let args = OftServerArgs::try_parse_from([
            "oft-server",
            "--private-key",
            KEY,
            "bridge",
            "--token-address",
            "0x1111111111111111111111111111111111111111",
            "--amount",
            "50",
            "--from-chain",
            "sepolia",
            "--to-chain",
            "base-sepolia",
            "--receiver-address",
            "0x2222222222222222222222222222222222222222",
        ])
        .unwrap();

        let Command::Bridge(bridge) = args.command else {
            panic!("expected bridge command");
        };
        let request = BridgeRequest::from(bridge);
        assert_eq!(request.extra_options, "0x");
        assert_eq!(request.to_chain, "base-sepolia");
    }

    #[test]
    fn test_debug_output_redacts_private_key() {
        let args = OftServerArgs::try_parse_from(["oft-server", "--private-key", KEY, "serve"])
            .unwrap();
        assert!(!format!("{args:?}").contains("ac0974bec39a17e3"));
    }
}
