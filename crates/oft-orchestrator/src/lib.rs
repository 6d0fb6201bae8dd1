pub mod amount;
pub mod bridge;
pub mod deploy;
pub mod error;
pub mod execution_log;

#[cfg(test)]
mod mock;

pub use bridge::BridgeOrchestrator;
pub use deploy::{DeployedContract, DeploymentOrchestrator};
pub use error::{Error, Result};
pub use execution_log::ExecutionLog;
