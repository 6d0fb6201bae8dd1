use alloy::primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_extra_options() -> String {
    "0x".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    pub token_address: String,
    /// Human-readable amount, always scaled by 18 decimals
    pub amount: String,
    pub from_chain: String,
    pub to_chain: String,
    pub receiver_address: String,
    #[serde(default = "default_extra_options")]
    pub extra_options: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeReceipt {
    pub request_id: Uuid,
    pub tx_hash: TxHash,
    pub token_address: Address,
    pub from_chain: String,
    pub to_chain: String,
    pub dst_eid: u32,
    pub amount: String,
    /// `amount` in local decimals, as a base-10 integer
    pub amount_ld: String,
    pub sender: Address,
    pub receiver: Address,
    /// Native fee quoted before sending, formatted in ether units
    pub estimated_native_fee: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_options_default() {
        let request: BridgeRequest = serde_json::from_str(
            r#"{
                "tokenAddress": "0x1111111111111111111111111111111111111111",
                "amount": "50",
                "fromChain": "sepolia",
                "toChain": "arbitrum-sepolia",
                "receiverAddress": "0x2222222222222222222222222222222222222222"
            }"#,
        )
        .unwrap();

        assert_eq!(request.extra_options, "0x");
        assert_eq!(request.amount, "50");
    }
}
