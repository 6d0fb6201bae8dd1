use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Configuration error: {message}"))]
    Configuration { message: String },

    #[snafu(display("Unknown chain: {chain}"))]
    UnknownChain { chain: String },

    #[snafu(display("Invalid address: {input}"))]
    InvalidAddress { input: String },

    #[snafu(display("Connection error on {chain}: {message}"))]
    Connection { chain: String, message: String },

    #[snafu(display("Chain interaction failed on {chain}: {message}"))]
    ChainInteraction { chain: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
