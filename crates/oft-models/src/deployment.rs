use alloy::primitives::{Address, TxHash, B256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ExecutionLogEntry;

pub const DEFAULT_DECIMALS: u8 = 18;
pub const MAX_DECIMALS: u8 = 18;

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub token_name: String,
    pub token_symbol: String,
    /// Raw integer supply; `decimals` is not applied to it
    pub initial_total_supply: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    pub target_chains: Vec<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DeploymentOutcome {
    Success { address: Address },
    Failed { error: String },
}

impl DeploymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDeployment {
    pub chain: String,
    #[serde(flatten)]
    pub outcome: DeploymentOutcome,
}

/// Result of a single configuration transaction (set peer, set enforced options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OperationOutcome {
    #[serde(rename_all = "camelCase")]
    Success { tx_hash: TxHash },
    Failed { error: String },
}

impl OperationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, OperationOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeeringResult {
    pub from_chain: String,
    pub to_chain: String,
    pub peer_eid: u32,
    pub peer: B256,
    #[serde(flatten)]
    pub outcome: OperationOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcedOptionsResult {
    pub chain: String,
    pub peer_eids: Vec<u32>,
    #[serde(flatten)]
    pub outcome: OperationOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Success,
    PartialSuccess,
    Failed,
}

impl OverallStatus {
    /// Nothing deployed is a failure; anything deployed alongside any failed
    /// step is partial.
    pub fn from_results(
        deployments: &[ChainDeployment],
        peering: &[PeeringResult],
        enforced_options: &[EnforcedOptionsResult],
    ) -> Self {
        if !deployments.iter().any(|d| d.outcome.is_success()) {
            return OverallStatus::Failed;
        }
        let any_failed = deployments.iter().any(|d| !d.outcome.is_success())
            || peering.iter().any(|p| p.outcome.is_failed())
            || enforced_options.iter().any(|e| e.outcome.is_failed());
        if any_failed {
            OverallStatus::PartialSuccess
        } else {
            OverallStatus::Success
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    pub request_id: Uuid,
    pub overall_status: OverallStatus,
    pub token_name: String,
    pub token_symbol: String,
    pub salt: B256,
    pub owner: Address,
    pub deployed_contracts: Vec<ChainDeployment>,
    pub peering_results: Vec<PeeringResult>,
    pub enforced_options_results: Vec<EnforcedOptionsResult>,
    pub execution_log: Vec<ExecutionLogEntry>,
}
