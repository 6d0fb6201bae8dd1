use oft_models::{
    BridgeReceipt, BridgeRequest, DeploymentReport, DeploymentRequest, OverallStatus, ToolResponse,
};
use oft_orchestrator::{BridgeOrchestrator, DeploymentOrchestrator};
use serde::Serialize;
use tracing::{error, info, warn};

pub const DEPLOY_TOOL: &str = "deploy-and-configure-oft-multichain";
pub const BRIDGE_TOOL: &str = "bridge-oft";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: DEPLOY_TOOL,
            description: "Deploy an OFT token at the same address on several chains, peer every pair and set enforced options",
        },
        ToolDescriptor {
            name: BRIDGE_TOOL,
            description: "Quote and send an OFT transfer from one configured chain to another",
        },
    ]
}

pub async fn deploy_and_configure(
    orchestrator: &DeploymentOrchestrator,
    request: DeploymentRequest,
) -> ToolResponse<DeploymentReport> {
    info!(
        "{DEPLOY_TOOL}: {} ({}) to {:?}",
        request.token_name, request.token_symbol, request.target_chains
    );

    match orchestrator.deploy_and_configure(request).await {
        Ok(report) => match report.overall_status {
            OverallStatus::Success => ToolResponse::success(report),
            OverallStatus::PartialSuccess => {
                warn!(request_id = %report.request_id, "Deployment partially succeeded");
                ToolResponse::completed_with_error(
                    report,
                    "Deployment partially succeeded, see the report for failed steps",
                )
            }
            OverallStatus::Failed => {
                warn!(request_id = %report.request_id, "Deployment failed");
                ToolResponse::completed_with_error(report, "No contract was deployed")
            }
        },
        Err(e) => {
            error!("{DEPLOY_TOOL} rejected: {e}");
            ToolResponse::failure(e.to_string())
        }
    }
}

pub async fn bridge(
    orchestrator: &BridgeOrchestrator,
    request: BridgeRequest,
) -> ToolResponse<BridgeReceipt> {
    info!(
        "{BRIDGE_TOOL}: {} of {} from {} to {}",
        request.amount, request.token_address, request.from_chain, request.to_chain
    );

    match orchestrator.bridge(request).await {
        Ok(receipt) => ToolResponse::success(receipt),
        Err(e) => {
            error!("{BRIDGE_TOOL} failed: {e}");
            ToolResponse::failure(e.to_string())
        }
    }
}
