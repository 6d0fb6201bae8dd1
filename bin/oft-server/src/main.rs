use clap::Parser;
use common::init_logger;
use oft_server::{
    load_config, run_server, tools, AppState, Command, ConfigurationSnafu, EncodeSnafu,
    InitLoggerSnafu, OftServerArgs, Result,
};
use serde::Serialize;
use snafu::ResultExt;

#[tokio::main]
async fn main() -> Result<()> {
    let args = OftServerArgs::parse();
    init_logger(&args.log_level).context(InitLoggerSnafu)?;

    let config = load_config(&args.config).context(ConfigurationSnafu)?;
    let state = AppState::from_config(config)?;

    match args.command {
        Command::Serve(serve) => run_server(serve, state).await,
        Command::Deploy(deploy) => {
            let response = tools::deploy_and_configure(&state.deployer, deploy.into()).await;
            print_response(&response, response.is_error)
        }
        Command::Bridge(bridge) => {
            let response = tools::bridge(&state.bridger, bridge.into()).await;
            print_response(&response, response.is_error)
        }
    }
}

fn print_response<T: Serialize>(response: &T, is_error: bool) -> Result<()> {
    let json = serde_json::to_string_pretty(response).context(EncodeSnafu)?;
    println!("{json}");
    if is_error {
        std::process::exit(1);
    }
    Ok(())
}
