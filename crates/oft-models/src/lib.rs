pub mod bridge;
pub mod chain;
pub mod deployment;
pub mod execution_log;
pub mod tool;

pub use bridge::*;
pub use chain::*;
pub use deployment::*;
pub use execution_log::*;
pub use tool::*;
