use alloy::primitives::{address, keccak256, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use oft_chains::{ChainRegistry, SignerProvider, SigningHandle};
use oft_contracts::{create2::predict_address, EnforcedOptionParam, MessagingFee, SendParam};
use oft_models::ChainConfig;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

pub const SIGNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const DEFAULT_OWNER: Address = address!("0x00000000000000000000000000000000000000a0");
pub const FACTORY: Address = address!("0x00000000000000000000000000000000000000fa");

pub fn test_registry() -> ChainRegistry {
    let chain = |name: &str, chain_id: u64, eid: u32, endpoint: u8, factory: Option<Address>| {
        ChainConfig {
            name: name.to_string(),
            rpc_url: format!("https://{name}.example.org"),
            chain_id,
            endpoint_address: Address::repeat_byte(endpoint),
            eid,
            factory_address: factory,
        }
    };
    ChainRegistry::new(vec![
        chain("sepolia", 11155111, 40161, 0x01, Some(FACTORY)),
        chain("arbitrum-sepolia", 421614, 40231, 0x02, Some(FACTORY)),
        chain("base-sepolia", 84532, 40245, 0x03, Some(FACTORY)),
        chain("no-factory", 1337, 40999, 0x04, None),
    ])
    .unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SignerFor,
    Deploy,
    SetPeer,
    SetEnforcedOptions,
    QuoteSend,
    Send,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SignerFor {
        chain: String,
    },
    Deploy {
        chain: String,
        factory: Address,
        init_code: Bytes,
        salt: B256,
    },
    SetPeer {
        chain: String,
        oft: Address,
        eid: u32,
        peer: B256,
    },
    SetEnforcedOptions {
        chain: String,
        oft: Address,
        options: Vec<EnforcedOptionParam>,
    },
    QuoteSend {
        chain: String,
        oft: Address,
        send_param: SendParam,
    },
    Send {
        chain: String,
        oft: Address,
        send_param: SendParam,
        fee: MessagingFee,
        refund_address: Address,
    },
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<Call>>,
    failures: HashSet<(String, Operation)>,
}

impl Recorder {
    fn record(&self, call: Call) -> TxHash {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        keccak256((calls.len() as u64).to_be_bytes())
    }

    fn check(&self, chain: &str, operation: Operation) -> oft_chains::Result<()> {
        if self.failures.contains(&(chain.to_string(), operation)) {
            return Err(oft_chains::Error::ChainInteraction {
                chain: chain.to_string(),
                message: format!("{operation:?}: execution reverted"),
            });
        }
        Ok(())
    }
}

/// Records every call and answers like a healthy chain unless told to fail.
pub struct MockSignerProvider {
    recorder: Arc<Recorder>,
    native_fee: U256,
}

impl MockSignerProvider {
    pub fn new() -> Self {
        Self {
            recorder: Arc::new(Recorder::default()),
            native_fee: U256::from(1_500_000_000_000_000u64),
        }
    }

    pub fn fail_on(mut self, chain: &str, operation: Operation) -> Self {
        Arc::get_mut(&mut self.recorder)
            .expect("configure failures before use")
            .failures
            .insert((chain.to_string(), operation));
        self
    }

    pub fn native_fee(&self) -> U256 {
        self.native_fee
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignerProvider for MockSignerProvider {
    async fn signer_for(&self, chain: &str) -> oft_chains::Result<Arc<dyn SigningHandle>> {
        test_registry().config_for(chain)?;
        if self
            .recorder
            .failures
            .contains(&(chain.to_string(), Operation::SignerFor))
        {
            return Err(oft_chains::Error::Connection {
                chain: chain.to_string(),
                message: "connection refused".to_string(),
            });
        }
        self.recorder.record(Call::SignerFor {
            chain: chain.to_string(),
        });
        Ok(Arc::new(MockHandle {
            chain: chain.to_string(),
            recorder: self.recorder.clone(),
            native_fee: self.native_fee,
        }))
    }
}

struct MockHandle {
    chain: String,
    recorder: Arc<Recorder>,
    native_fee: U256,
}

#[async_trait]
impl SigningHandle for MockHandle {
    fn chain(&self) -> &str {
        &self.chain
    }

    fn address(&self) -> Address {
        SIGNER
    }

    async fn deploy_with_factory(
        &self,
        factory: Address,
        init_code: Bytes,
        salt: B256,
    ) -> oft_chains::Result<Address> {
        let deployed = predict_address(factory, salt, &init_code);
        self.recorder.record(Call::Deploy {
            chain: self.chain.clone(),
            factory,
            init_code,
            salt,
        });
        self.recorder.check(&self.chain, Operation::Deploy)?;
        Ok(deployed)
    }

    async fn set_peer(&self, oft: Address, eid: u32, peer: B256) -> oft_chains::Result<TxHash> {
        let tx_hash = self.recorder.record(Call::SetPeer {
            chain: self.chain.clone(),
            oft,
            eid,
            peer,
        });
        self.recorder.check(&self.chain, Operation::SetPeer)?;
        Ok(tx_hash)
    }

    async fn set_enforced_options(
        &self,
        oft: Address,
        options: Vec<EnforcedOptionParam>,
    ) -> oft_chains::Result<TxHash> {
        let tx_hash = self.recorder.record(Call::SetEnforcedOptions {
            chain: self.chain.clone(),
            oft,
            options,
        });
        self.recorder
            .check(&self.chain, Operation::SetEnforcedOptions)?;
        Ok(tx_hash)
    }

    async fn quote_send(
        &self,
        oft: Address,
        send_param: SendParam,
    ) -> oft_chains::Result<MessagingFee> {
        self.recorder.record(Call::QuoteSend {
            chain: self.chain.clone(),
            oft,
            send_param,
        });
        self.recorder.check(&self.chain, Operation::QuoteSend)?;
        Ok(MessagingFee {
            nativeFee: self.native_fee,
            lzTokenFee: U256::from(7u64),
        })
    }

    async fn send(
        &self,
        oft: Address,
        send_param: SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> oft_chains::Result<TxHash> {
        let tx_hash = self.recorder.record(Call::Send {
            chain: self.chain.clone(),
            oft,
            send_param,
            fee,
            refund_address,
        });
        self.recorder.check(&self.chain, Operation::Send)?;
        Ok(tx_hash)
    }
}
