pub mod address;
pub mod error;
pub mod registry;
pub mod signer;

pub use address::{address_to_peer, parse_address, to_peer_format};
pub use error::{Error, Result};
pub use registry::ChainRegistry;
pub use signer::{AlloySignerProvider, SignerProvider, SigningHandle};
