use crate::{ChainRegistry, Error, Result};
use alloy::{
    hex,
    primitives::{keccak256, Address, Bytes, TxHash, B256},
    providers::DynProvider,
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::RpcError,
};
use async_trait::async_trait;
use common::{create_wallet_provider, ProviderError};
use dashmap::DashMap;
use oft_contracts::{EnforcedOptionParam, IDeterministicFactory, MessagingFee, SendParam, IOFT};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Transaction-signing handle bound to one chain.
///
/// Every mutating call waits for the transaction receipt and fails if the
/// transaction reverted.
#[async_trait]
pub trait SigningHandle: Send + Sync {
    fn chain(&self) -> &str;

    fn address(&self) -> Address;

    /// Deploys `init_code` through the factory and returns the address the factory reports.
    async fn deploy_with_factory(
        &self,
        factory: Address,
        init_code: Bytes,
        salt: B256,
    ) -> Result<Address>;

    async fn set_peer(&self, oft: Address, eid: u32, peer: B256) -> Result<TxHash>;

    async fn set_enforced_options(
        &self,
        oft: Address,
        options: Vec<EnforcedOptionParam>,
    ) -> Result<TxHash>;

    async fn quote_send(&self, oft: Address, send_param: SendParam) -> Result<MessagingFee>;

    async fn send(
        &self,
        oft: Address,
        send_param: SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> Result<TxHash>;
}

#[async_trait]
pub trait SignerProvider: Send + Sync {
    async fn signer_for(&self, chain: &str) -> Result<Arc<dyn SigningHandle>>;
}

pub fn parse_private_key(private_key: &SecretString) -> Result<Zeroizing<[u8; 32]>> {
    let bytes = Zeroizing::new(
        hex::decode(private_key.expose_secret().trim()).map_err(|_| Error::Configuration {
            message: "private key is not valid hex".to_string(),
        })?,
    );
    if bytes.len() != 32 {
        return Err(Error::Configuration {
            message: format!("private key must be 32 bytes, got {}", bytes.len()),
        });
    }
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&bytes);
    Ok(key)
}

/// Hands out one cached alloy signing handle per chain, all signing with the same key.
pub struct AlloySignerProvider {
    registry: Arc<ChainRegistry>,
    private_key: Zeroizing<[u8; 32]>,
    address: Address,
    handles: DashMap<String, Arc<dyn SigningHandle>>,
}

impl AlloySignerProvider {
    pub fn new(registry: Arc<ChainRegistry>, private_key: &SecretString) -> Result<Self> {
        let private_key = parse_private_key(private_key)?;
        let signer = PrivateKeySigner::from_bytes(&B256::from(*private_key)).map_err(|e| {
            Error::Configuration {
                message: format!("invalid private key: {e}"),
            }
        })?;
        let address = signer.address();
        info!("Signer provider initialized for {}", address);

        Ok(Self {
            registry,
            private_key,
            address,
            handles: DashMap::new(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl SignerProvider for AlloySignerProvider {
    async fn signer_for(&self, chain: &str) -> Result<Arc<dyn SigningHandle>> {
        if let Some(handle) = self.handles.get(chain) {
            return Ok(handle.value().clone());
        }

        let config = self.registry.config_for(chain)?;
        let provider = create_wallet_provider(&config.rpc_url, *self.private_key)
            .await
            .map_err(|e| match e {
                ProviderError::Client { .. } => Error::Connection {
                    chain: chain.to_string(),
                    message: e.to_string(),
                },
                _ => Error::Configuration {
                    message: format!("{chain}: {e}"),
                },
            })?;
        debug!("Created signing handle for {} ({})", chain, config.rpc_url);

        let handle: Arc<dyn SigningHandle> =
            Arc::new(AlloySigningHandle::new(chain, provider, self.address));
        // a concurrent request may have raced us here; either handle is equivalent
        self.handles.insert(chain.to_string(), handle.clone());
        Ok(handle)
    }
}

pub struct AlloySigningHandle {
    chain: String,
    provider: DynProvider,
    address: Address,
}

impl AlloySigningHandle {
    pub fn new(chain: &str, provider: DynProvider, address: Address) -> Self {
        Self {
            chain: chain.to_string(),
            provider,
            address,
        }
    }

    fn contract_error(&self, error: alloy::contract::Error) -> Error {
        match &error {
            alloy::contract::Error::TransportError(RpcError::Transport(_)) => Error::Connection {
                chain: self.chain.clone(),
                message: error.to_string(),
            },
            _ => self.interaction_error(error),
        }
    }

    fn interaction_error(&self, error: impl std::fmt::Display) -> Error {
        Error::ChainInteraction {
            chain: self.chain.clone(),
            message: error.to_string(),
        }
    }

    fn ensure_success(&self, receipt: &TransactionReceipt) -> Result<TxHash> {
        if receipt.status() {
            Ok(receipt.transaction_hash)
        } else {
            Err(self.interaction_error(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )))
        }
    }
}

#[async_trait]
impl SigningHandle for AlloySigningHandle {
    fn chain(&self) -> &str {
        &self.chain
    }

    fn address(&self) -> Address {
        self.address
    }

    async fn deploy_with_factory(
        &self,
        factory: Address,
        init_code: Bytes,
        salt: B256,
    ) -> Result<Address> {
        let factory = IDeterministicFactory::new(factory, self.provider.clone());
        let code_hash = keccak256(&init_code);

        let receipt = factory
            .deploy_call(init_code, salt)
            .send()
            .await
            .map_err(|e| self.contract_error(e))?
            .get_receipt()
            .await
            .map_err(|e| self.interaction_error(e))?;
        let tx_hash = self.ensure_success(&receipt)?;
        debug!("Factory deployment confirmed on {}: {}", self.chain, tx_hash);

        factory
            .computeAddress(salt, code_hash)
            .call()
            .await
            .map_err(|e| self.contract_error(e))
    }

    async fn set_peer(&self, oft: Address, eid: u32, peer: B256) -> Result<TxHash> {
        let receipt = IOFT::new(oft, self.provider.clone())
            .setPeer(eid, peer)
            .send()
            .await
            .map_err(|e| self.contract_error(e))?
            .get_receipt()
            .await
            .map_err(|e| self.interaction_error(e))?;
        self.ensure_success(&receipt)
    }

    async fn set_enforced_options(
        &self,
        oft: Address,
        options: Vec<EnforcedOptionParam>,
    ) -> Result<TxHash> {
        let receipt = IOFT::new(oft, self.provider.clone())
            .setEnforcedOptions(options)
            .send()
            .await
            .map_err(|e| self.contract_error(e))?
            .get_receipt()
            .await
            .map_err(|e| self.interaction_error(e))?;
        self.ensure_success(&receipt)
    }

    async fn quote_send(&self, oft: Address, send_param: SendParam) -> Result<MessagingFee> {
        IOFT::new(oft, self.provider.clone())
            .quoteSend(send_param, false)
            .call()
            .await
            .map_err(|e| self.contract_error(e))
    }

    async fn send(
        &self,
        oft: Address,
        send_param: SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> Result<TxHash> {
        let native_fee = fee.nativeFee;
        let receipt = IOFT::new(oft, self.provider.clone())
            .send(send_param, fee, refund_address)
            .value(native_fee)
            .send()
            .await
            .map_err(|e| self.contract_error(e))?
            .get_receipt()
            .await
            .map_err(|e| self.interaction_error(e))?;
        self.ensure_success(&receipt)
    }
}
