use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Artifact not configured: {artifact}"))]
    ArtifactNotConfigured { artifact: String },

    #[snafu(display("Invalid request: {message}"))]
    InvalidRequest { message: String },

    #[snafu(display("{source}"))]
    Chain { source: oft_chains::Error },
}

impl From<oft_chains::Error> for Error {
    fn from(error: oft_chains::Error) -> Self {
        Error::Chain { source: error }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
