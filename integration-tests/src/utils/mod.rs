use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use ctor::ctor;
use oft_chains::{ChainRegistry, SignerProvider, SigningHandle};
use oft_contracts::{
    create2::predict_address, EnforcedOptionParam, MessagingFee, SendParam, TokenArtifact,
};
use oft_models::ChainConfig;
use oft_server::{build_router, AppState};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing_subscriber::EnvFilter;

pub const INTEGRATION_TEST_TIMEOUT_SECS: u64 = 10;
pub const TEST_SIGNER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const TEST_FACTORY: Address = address!("0x00000000000000000000000000000000000000fa");
pub const TEST_NATIVE_FEE: u64 = 2_000_000_000_000_000;

pub async fn get_free_port() -> u16 {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("Should be able to bind to port");

    listener
        .local_addr()
        .expect("Should have a local address")
        .port()
}

pub fn test_registry() -> Arc<ChainRegistry> {
    let chain = |name: &str, chain_id: u64, eid: u32| ChainConfig {
        name: name.to_string(),
        rpc_url: format!("http://127.0.0.1:1/{name}"),
        chain_id,
        endpoint_address: address!("0x6EDCE65403992e310A62460808c4b910D972f10f"),
        eid,
        factory_address: Some(TEST_FACTORY),
    };
    Arc::new(
        ChainRegistry::new(vec![
            chain("sepolia", 11155111, 40161),
            chain("arbitrum-sepolia", 421614, 40231),
            chain("base-sepolia", 84532, 40245),
        ])
        .expect("test registry should be valid"),
    )
}

/// Chain stand-in that answers every call successfully unless the chain is marked failing.
#[derive(Default)]
pub struct FakeSignerProvider {
    failing_chains: HashSet<String>,
    sent: Arc<Mutex<Vec<(String, SendParam)>>>,
}

impl FakeSignerProvider {
    pub fn failing_on(chains: &[&str]) -> Self {
        Self {
            failing_chains: chains.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, SendParam)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignerProvider for FakeSignerProvider {
    async fn signer_for(&self, chain: &str) -> oft_chains::Result<Arc<dyn SigningHandle>> {
        Ok(Arc::new(FakeHandle {
            chain: chain.to_string(),
            failing: self.failing_chains.contains(chain),
            sent: self.sent.clone(),
        }))
    }
}

struct FakeHandle {
    chain: String,
    failing: bool,
    sent: Arc<Mutex<Vec<(String, SendParam)>>>,
}

impl FakeHandle {
    fn tx_hash(&self, label: &str) -> oft_chains::Result<TxHash> {
        if self.failing {
            return Err(oft_chains::Error::ChainInteraction {
                chain: self.chain.clone(),
                message: "execution reverted".to_string(),
            });
        }
        Ok(keccak256(format!("{}:{label}", self.chain)))
    }
}

#[async_trait]
impl SigningHandle for FakeHandle {
    fn chain(&self) -> &str {
        &self.chain
    }

    fn address(&self) -> Address {
        TEST_SIGNER
    }

    async fn deploy_with_factory(
        &self,
        factory: Address,
        init_code: Bytes,
        salt: B256,
    ) -> oft_chains::Result<Address> {
        self.tx_hash("deploy")?;
        Ok(predict_address(factory, salt, &init_code))
    }

    async fn set_peer(&self, _oft: Address, eid: u32, _peer: B256) -> oft_chains::Result<TxHash> {
        self.tx_hash(&format!("peer-{eid}"))
    }

    async fn set_enforced_options(
        &self,
        _oft: Address,
        _options: Vec<EnforcedOptionParam>,
    ) -> oft_chains::Result<TxHash> {
        self.tx_hash("options")
    }

    async fn quote_send(
        &self,
        _oft: Address,
        _send_param: SendParam,
    ) -> oft_chains::Result<MessagingFee> {
        self.tx_hash("quote")?;
        Ok(MessagingFee {
            nativeFee: U256::from(TEST_NATIVE_FEE),
            lzTokenFee: U256::ZERO,
        })
    }

    async fn send(
        &self,
        _oft: Address,
        send_param: SendParam,
        _fee: MessagingFee,
        _refund_address: Address,
    ) -> oft_chains::Result<TxHash> {
        let tx_hash = self.tx_hash("send")?;
        self.sent
            .lock()
            .unwrap()
            .push((self.chain.clone(), send_param));
        Ok(tx_hash)
    }
}

pub fn test_artifact() -> TokenArtifact {
    TokenArtifact {
        bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
    }
}

/// Serves the tool router on a free port and waits until `/status` answers.
pub async fn start_tool_server(
    signers: Arc<FakeSignerProvider>,
    cors_domain: Option<&str>,
) -> (u16, JoinHandle<()>) {
    let state = AppState::new(test_registry(), signers, Some(test_artifact()), TEST_SIGNER);
    let app = build_router(state, cors_domain);

    let port = get_free_port().await;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("Should be able to bind to port");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Tool server should not crash");
    });

    wait_for_tool_server_to_be_ready(port).await;
    (port, handle)
}

pub async fn wait_for_tool_server_to_be_ready(port: u16) {
    let client = reqwest::Client::new();
    let status_url = format!("http://127.0.0.1:{port}/status");

    let start_time = std::time::Instant::now();
    let timeout = Duration::from_secs(INTEGRATION_TEST_TIMEOUT_SECS);

    loop {
        assert!(
            (start_time.elapsed() <= timeout),
            "Timeout waiting for tool server to become ready"
        );

        if let Ok(response) = client.get(&status_url).send().await {
            if response.status() == 200 {
                break;
            }
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[ctor]
fn init_test_tracing() {
    let has_nocapture = std::env::args().any(|arg| arg == "--nocapture" || arg == "--show-output");
    if has_nocapture {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .try_init()
            .ok();
    }
}
