use crate::{Error, Result};
use oft_models::ChainConfig;
use std::collections::BTreeMap;

/// Read-only table of chain connection parameters, keyed by chain name.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: BTreeMap<String, ChainConfig>,
}

impl ChainRegistry {
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for chain in chains {
            if table.contains_key(&chain.name) {
                return Err(Error::Configuration {
                    message: format!("chain '{}' is configured twice", chain.name),
                });
            }
            table.insert(chain.name.clone(), chain);
        }

        if table.is_empty() {
            return Err(Error::Configuration {
                message: "no chains configured".to_string(),
            });
        }

        Ok(Self { chains: table })
    }

    pub fn config_for(&self, name: &str) -> Result<&ChainConfig> {
        self.chains.get(name).ok_or_else(|| Error::UnknownChain {
            chain: name.to_string(),
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.chains.keys().cloned().collect()
    }
}
