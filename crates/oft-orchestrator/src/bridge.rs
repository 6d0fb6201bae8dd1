use alloy::{
    hex,
    primitives::{utils::format_ether, Address, Bytes, U256},
};
use oft_chains::{address_to_peer, parse_address, ChainRegistry, SignerProvider};
use oft_contracts::{MessagingFee, SendParam};
use oft_models::{BridgeReceipt, BridgeRequest, Phase};
use std::sync::Arc;
use uuid::Uuid;

use crate::{amount::parse_bridge_amount, Error, ExecutionLog, Result};

pub struct BridgeOrchestrator {
    registry: Arc<ChainRegistry>,
    signers: Arc<dyn SignerProvider>,
}

struct BridgePlan {
    token: Address,
    receiver: Address,
    amount: U256,
    dst_eid: u32,
    extra_options: Bytes,
}

impl BridgeOrchestrator {
    pub fn new(registry: Arc<ChainRegistry>, signers: Arc<dyn SignerProvider>) -> Self {
        Self { registry, signers }
    }

    /// Quotes the messaging fee for the transfer, then sends it paying that fee in native currency.
    pub async fn bridge(&self, request: BridgeRequest) -> Result<BridgeReceipt> {
        let plan = self.validate(&request)?;
        let mut log = ExecutionLog::new(Uuid::new_v4());
        let from_chain = request.from_chain.as_str();

        let signer = self.signers.signer_for(from_chain).await?;
        let sender = signer.address();

        let send_param = SendParam {
            dstEid: plan.dst_eid,
            to: address_to_peer(plan.receiver),
            amountLD: plan.amount,
            minAmountLD: plan.amount,
            extraOptions: plan.extra_options,
            composeMsg: Bytes::new(),
            oftCmd: Bytes::new(),
        };

        let quote = signer.quote_send(plan.token, send_param.clone()).await?;
        log.record(
            Phase::Bridge,
            Some(from_chain),
            format!(
                "Quoted {} native fee for {} {} to {} (eid {})",
                format_ether(quote.nativeFee),
                request.amount,
                plan.token,
                request.to_chain,
                plan.dst_eid
            ),
        );

        let fee = MessagingFee {
            nativeFee: quote.nativeFee,
            lzTokenFee: U256::ZERO,
        };
        let tx_hash = signer.send(plan.token, send_param, fee, sender).await?;
        log.record(Phase::Bridge, Some(from_chain), format!("Sent in {tx_hash}"));

        Ok(BridgeReceipt {
            request_id: log.request_id(),
            tx_hash,
            token_address: plan.token,
            from_chain: request.from_chain,
            to_chain: request.to_chain,
            dst_eid: plan.dst_eid,
            amount: request.amount,
            amount_ld: plan.amount.to_string(),
            sender,
            receiver: plan.receiver,
            estimated_native_fee: format_ether(quote.nativeFee),
        })
    }

    fn validate(&self, request: &BridgeRequest) -> Result<BridgePlan> {
        if request.from_chain == request.to_chain {
            return Err(Error::InvalidRequest {
                message: format!(
                    "fromChain and toChain must differ, both are '{}'",
                    request.from_chain
                ),
            });
        }
        self.registry.config_for(&request.from_chain)?;
        let dst_eid = self.registry.config_for(&request.to_chain)?.eid;

        let token = parse_address(&request.token_address)?;
        let receiver = parse_address(&request.receiver_address)?;
        let extra_options = hex::decode(request.extra_options.trim()).map_err(|e| {
            Error::InvalidRequest {
                message: format!("extraOptions is not valid hex: {e}"),
            }
        })?;
        let amount = parse_bridge_amount(&request.amount)?;

        Ok(BridgePlan {
            token,
            receiver,
            amount,
            dst_eid,
            extra_options: extra_options.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{test_registry, Call, MockSignerProvider, Operation, SIGNER};

    const TOKEN: &str = "0x1111111111111111111111111111111111111111";
    const RECEIVER: &str = "0x2222222222222222222222222222222222222222";

    fn orchestrator(signers: Arc<MockSignerProvider>) -> BridgeOrchestrator {
        BridgeOrchestrator::new(Arc::new(test_registry()), signers)
    }

    fn request(amount: &str) -> BridgeRequest {
        BridgeRequest {
            token_address: TOKEN.to_string(),
            amount: amount.to_string(),
            from_chain: "sepolia".to_string(),
            to_chain: "arbitrum-sepolia".to_string(),
            receiver_address: RECEIVER.to_string(),
            extra_options: "0x".to_string(),
        }
    }

    #[tokio::test]
    async fn test_bridge_quotes_then_sends() {
        let signers = Arc::new(MockSignerProvider::new());
        let receipt = orchestrator(signers.clone())
            .bridge(request("50"))
            .await
            .unwrap();

        let fifty = U256::from(50u64) * U256::from(10u64).pow(U256::from(18u64));
        let calls = signers.calls();
        let quoted = calls
            .iter()
            .find_map(|call| match call {
                Call::QuoteSend { send_param, .. } => Some(send_param.clone()),
                _ => None,
            })
            .unwrap();
        let (sent, fee, refund_address) = calls
            .iter()
            .find_map(|call| match call {
                Call::Send {
                    send_param,
                    fee,
                    refund_address,
                    ..
                } => Some((send_param.clone(), fee.clone(), *refund_address)),
                _ => None,
            })
            .unwrap();

        assert_eq!(quoted, sent);
        assert_eq!(sent.amountLD, fifty);
        assert_eq!(sent.minAmountLD, sent.amountLD);
        assert_eq!(sent.dstEid, 40231);
        assert_eq!(sent.to, address_to_peer(parse_address(RECEIVER).unwrap()));
        assert!(sent.extraOptions.is_empty());
        assert!(sent.composeMsg.is_empty());
        assert!(sent.oftCmd.is_empty());

        assert_eq!(fee.nativeFee, signers.native_fee());
        assert_eq!(fee.lzTokenFee, U256::ZERO);
        assert_eq!(refund_address, SIGNER);

        assert_eq!(receipt.sender, SIGNER);
        assert_eq!(receipt.amount_ld, fifty.to_string());
        assert_eq!(receipt.estimated_native_fee, "0.001500000000000000");
        assert_eq!(receipt.from_chain, "sepolia");
        assert_eq!(receipt.to_chain, "arbitrum-sepolia");
    }

    #[tokio::test]
    async fn test_extra_options_are_forwarded() {
        let signers = Arc::new(MockSignerProvider::new());
        let mut req = request("1.5");
        req.extra_options = "0x00030100110100000000000000000000000000030d40".to_string();
        orchestrator(signers.clone()).bridge(req).await.unwrap();

        let sent = signers
            .calls()
            .into_iter()
            .find_map(|call| match call {
                Call::Send { send_param, .. } => Some(send_param),
                _ => None,
            })
            .unwrap();
        assert_eq!(sent.extraOptions.len(), 22);
        assert_eq!(sent.amountLD, U256::from(1_500_000_000_000_000_000u64));
    }

    #[tokio::test]
    async fn test_same_chain_is_rejected_before_any_call() {
        let signers = Arc::new(MockSignerProvider::new());
        let mut req = request("50");
        req.to_chain = req.from_chain.clone();

        let result = orchestrator(signers.clone()).bridge(req).await;
        assert!(matches!(result, Err(Error::InvalidRequest { .. })));
        assert!(signers.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_requests() {
        let signers = Arc::new(MockSignerProvider::new());
        let orchestrator = orchestrator(signers.clone());

        let mut unknown = request("50");
        unknown.to_chain = "mainnet".to_string();
        assert!(matches!(
            orchestrator.bridge(unknown).await,
            Err(Error::Chain {
                source: oft_chains::Error::UnknownChain { .. }
            })
        ));

        let mut bad_receiver = request("50");
        bad_receiver.receiver_address = "0xdead".to_string();
        assert!(matches!(
            orchestrator.bridge(bad_receiver).await,
            Err(Error::Chain {
                source: oft_chains::Error::InvalidAddress { .. }
            })
        ));

        let mut bad_options = request("50");
        bad_options.extra_options = "0xnothex".to_string();
        assert!(matches!(
            orchestrator.bridge(bad_options).await,
            Err(Error::InvalidRequest { .. })
        ));

        assert!(matches!(
            orchestrator.bridge(request("fifty")).await,
            Err(Error::InvalidRequest { .. })
        ));
        assert!(signers.calls().is_empty());
    }

    #[tokio::test]
    async fn test_quote_failure_skips_send() {
        let signers = Arc::new(MockSignerProvider::new().fail_on("sepolia", Operation::QuoteSend));
        let result = orchestrator(signers.clone()).bridge(request("50")).await;

        match result {
            Err(Error::Chain {
                source: oft_chains::Error::ChainInteraction { chain, message },
            }) => {
                assert_eq!(chain, "sepolia");
                assert!(message.contains("execution reverted"));
            }
            other => panic!("expected chain interaction error, got {other:?}"),
        }
        assert!(!signers
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Send { .. })));
    }
}
