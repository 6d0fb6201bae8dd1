//! Deterministic multi-chain OFT deployment followed by mesh configuration.
//!
//! The workflow runs four phases strictly in order: deployment, peering,
//! enforced options and report assembly. The first failed transaction stops
//! the run; confirmed transactions are never undone.

use alloy::primitives::{Address, Bytes, B256, U256};
use oft_chains::{address_to_peer, parse_address, ChainRegistry, SignerProvider, SigningHandle};
use oft_contracts::{
    create2::{constructor_args, deployment_salt, init_code, predict_address},
    options::{default_enforced_options, SEND_MSG_TYPE},
    EnforcedOptionParam, TokenArtifact,
};
use oft_models::{
    ChainConfig, ChainDeployment, DeploymentOutcome, DeploymentReport, DeploymentRequest,
    EnforcedOptionsResult, OperationOutcome, OverallStatus, PeeringResult, Phase, MAX_DECIMALS,
};
use std::{ops::ControlFlow, sync::Arc};
use tracing::warn;
use uuid::Uuid;

use crate::{amount::parse_initial_supply, Error, ExecutionLog, Result};

/// A contract confirmed during the current run. Dropped with the report.
pub struct DeployedContract {
    pub chain: String,
    pub address: Address,
    pub handle: Arc<dyn SigningHandle>,
    pub eid: u32,
    pub config: ChainConfig,
}

/// Validated request, ready to touch the chains.
struct DeploymentPlan {
    token_name: String,
    token_symbol: String,
    supply: U256,
    owner: Address,
    salt: B256,
    chains: Vec<(ChainConfig, Address)>,
}

#[derive(Default)]
struct DeploymentRun {
    deployments: Vec<ChainDeployment>,
    contracts: Vec<DeployedContract>,
    peering: Vec<PeeringResult>,
    enforced_options: Vec<EnforcedOptionsResult>,
}

pub struct DeploymentOrchestrator {
    registry: Arc<ChainRegistry>,
    signers: Arc<dyn SignerProvider>,
    token_artifact: Option<TokenArtifact>,
    default_owner: Address,
}

impl DeploymentOrchestrator {
    pub fn new(
        registry: Arc<ChainRegistry>,
        signers: Arc<dyn SignerProvider>,
        token_artifact: Option<TokenArtifact>,
        default_owner: Address,
    ) -> Self {
        Self {
            registry,
            signers,
            token_artifact,
            default_owner,
        }
    }

    /// Deploys the token to every target chain, then peers and configures the deployed set.
    ///
    /// Validation failures are returned as errors before any transaction is sent.
    /// Once transactions start, failures are reported inside the returned report.
    pub async fn deploy_and_configure(&self, request: DeploymentRequest) -> Result<DeploymentReport> {
        let mut log = ExecutionLog::new(Uuid::new_v4());
        let (artifact, plan) = self.validate(&request)?;
        log.record(
            Phase::Validation,
            None,
            format!(
                "Deploying {} ({}) to [{}] with owner {} and salt {}",
                plan.token_name,
                plan.token_symbol,
                plan.chains
                    .iter()
                    .map(|(chain, _)| chain.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                plan.owner,
                plan.salt
            ),
        );
        if request.decimals != MAX_DECIMALS {
            log.record(
                Phase::Validation,
                None,
                format!(
                    "Requested decimals {} are not applied to the initial supply of {}",
                    request.decimals, plan.supply
                ),
            );
        }

        let mut run = DeploymentRun::default();
        let mut flow = self
            .deploy_contracts(&artifact.bytecode, &plan, &mut run, &mut log)
            .await;
        if flow.is_continue() {
            flow = self.wire_peers(&mut run, &mut log).await;
        }
        if flow.is_continue() {
            self.set_enforced_options(&mut run, &mut log).await;
        }

        let overall_status =
            OverallStatus::from_results(&run.deployments, &run.peering, &run.enforced_options);
        log.record(
            Phase::Report,
            None,
            format!("Finished with status {overall_status:?}"),
        );

        Ok(DeploymentReport {
            request_id: log.request_id(),
            overall_status,
            token_name: plan.token_name,
            token_symbol: plan.token_symbol,
            salt: plan.salt,
            owner: plan.owner,
            deployed_contracts: run.deployments,
            peering_results: run.peering,
            enforced_options_results: run.enforced_options,
            execution_log: log.into_entries(),
        })
    }

    fn validate(&self, request: &DeploymentRequest) -> Result<(&TokenArtifact, DeploymentPlan)> {
        let artifact = self
            .token_artifact
            .as_ref()
            .ok_or_else(|| Error::ArtifactNotConfigured {
                artifact: "OFT token bytecode".to_string(),
            })?;

        if request.target_chains.is_empty() {
            return Err(Error::InvalidRequest {
                message: "targetChains must name at least one chain".to_string(),
            });
        }
        let token_name = request.token_name.as_str();
        let token_symbol = request.token_symbol.as_str();
        if token_name.trim().is_empty() || token_symbol.trim().is_empty() {
            return Err(Error::InvalidRequest {
                message: "tokenName and tokenSymbol must not be empty".to_string(),
            });
        }
        if request.decimals > MAX_DECIMALS {
            return Err(Error::InvalidRequest {
                message: format!(
                    "decimals must be between 0 and {MAX_DECIMALS}, got {}",
                    request.decimals
                ),
            });
        }
        let supply = parse_initial_supply(&request.initial_total_supply)?;

        let mut chains: Vec<(ChainConfig, Address)> = Vec::new();
        for name in &request.target_chains {
            if chains.iter().any(|(chain, _)| &chain.name == name) {
                continue;
            }
            let config = self.registry.config_for(name)?;
            let factory = config
                .factory_address
                .ok_or_else(|| Error::ArtifactNotConfigured {
                    artifact: format!("deterministic deployment factory for {name}"),
                })?;
            chains.push((config.clone(), factory));
        }

        let owner = match &request.owner {
            Some(owner) => parse_address(owner)?,
            None => self.default_owner,
        };

        Ok((
            artifact,
            DeploymentPlan {
                token_name: token_name.to_string(),
                token_symbol: token_symbol.to_string(),
                supply,
                owner,
                salt: deployment_salt(token_name, token_symbol),
                chains,
            },
        ))
    }

    async fn deploy_contracts(
        &self,
        bytecode: &Bytes,
        plan: &DeploymentPlan,
        run: &mut DeploymentRun,
        log: &mut ExecutionLog,
    ) -> ControlFlow<()> {
        for (config, factory) in &plan.chains {
            let chain = config.name.as_str();
            let args = constructor_args(
                &plan.token_name,
                &plan.token_symbol,
                plan.supply,
                config.endpoint_address,
                plan.owner,
            );
            let code = init_code(bytecode, &args);
            let predicted = predict_address(*factory, plan.salt, &code);
            log.record(
                Phase::Deployment,
                Some(chain),
                format!("Deploying through factory {factory}, predicted address {predicted}"),
            );

            let deployed = async {
                let handle = self.signers.signer_for(chain).await?;
                let address = handle.deploy_with_factory(*factory, code, plan.salt).await?;
                Ok::<_, oft_chains::Error>((handle, address))
            }
            .await;

            match deployed {
                Ok((handle, address)) => {
                    if address != predicted {
                        warn!(
                            "Factory on {} reported {} instead of predicted {}",
                            chain, address, predicted
                        );
                    }
                    log.record(Phase::Deployment, Some(chain), format!("Deployed at {address}"));
                    run.deployments.push(ChainDeployment {
                        chain: chain.to_string(),
                        outcome: DeploymentOutcome::Success { address },
                    });
                    run.contracts.push(DeployedContract {
                        chain: chain.to_string(),
                        address,
                        handle,
                        eid: config.eid,
                        config: config.clone(),
                    });
                }
                Err(e) => {
                    let error = e.to_string();
                    log.record_failure(
                        Phase::Deployment,
                        Some(chain),
                        format!("Deployment failed: {error}"),
                    );
                    run.deployments.push(ChainDeployment {
                        chain: chain.to_string(),
                        outcome: DeploymentOutcome::Failed { error },
                    });
                    log.record_failure(
                        Phase::Deployment,
                        Some(chain),
                        "Aborting: remaining chains, peering and enforced options are skipped",
                    );
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    async fn wire_peers(&self, run: &mut DeploymentRun, log: &mut ExecutionLog) -> ControlFlow<()> {
        if run.contracts.len() < 2 {
            log.record(
                Phase::Peering,
                None,
                "Skipping peering: fewer than two contracts deployed",
            );
            return ControlFlow::Continue(());
        }

        for local in &run.contracts {
            for remote in &run.contracts {
                if local.chain == remote.chain {
                    continue;
                }
                let peer = address_to_peer(remote.address);
                log.record(
                    Phase::Peering,
                    Some(&local.chain),
                    format!("Setting peer {} (eid {}) to {}", remote.chain, remote.eid, peer),
                );

                let outcome = match local.handle.set_peer(local.address, remote.eid, peer).await {
                    Ok(tx_hash) => OperationOutcome::Success { tx_hash },
                    Err(e) => OperationOutcome::Failed {
                        error: e.to_string(),
                    },
                };
                let failed = outcome.is_failed();
                if let OperationOutcome::Failed { error } = &outcome {
                    log.record_failure(
                        Phase::Peering,
                        Some(&local.chain),
                        format!("Setting peer {} failed: {error}", remote.chain),
                    );
                }
                run.peering.push(PeeringResult {
                    from_chain: local.chain.clone(),
                    to_chain: remote.chain.clone(),
                    peer_eid: remote.eid,
                    peer,
                    outcome,
                });
                if failed {
                    log.record_failure(
                        Phase::Peering,
                        Some(&local.chain),
                        "Aborting: remaining peers and enforced options are skipped",
                    );
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    async fn set_enforced_options(&self, run: &mut DeploymentRun, log: &mut ExecutionLog) {
        let options = default_enforced_options();

        for local in &run.contracts {
            let params: Vec<EnforcedOptionParam> = run
                .contracts
                .iter()
                .filter(|remote| remote.chain != local.chain)
                .map(|remote| EnforcedOptionParam {
                    eid: remote.eid,
                    msgType: SEND_MSG_TYPE,
                    options: options.clone(),
                })
                .collect();
            let peer_eids: Vec<u32> = params.iter().map(|param| param.eid).collect();

            log.record(
                Phase::EnforcedOptions,
                Some(&local.chain),
                format!("Setting enforced options for eids {peer_eids:?}"),
            );
            match local.handle.set_enforced_options(local.address, params).await {
                Ok(tx_hash) => run.enforced_options.push(EnforcedOptionsResult {
                    chain: local.chain.clone(),
                    peer_eids,
                    outcome: OperationOutcome::Success { tx_hash },
                }),
                Err(e) => {
                    let error = e.to_string();
                    log.record_failure(
                        Phase::EnforcedOptions,
                        Some(&local.chain),
                        format!("Setting enforced options failed: {error}"),
                    );
                    run.enforced_options.push(EnforcedOptionsResult {
                        chain: local.chain.clone(),
                        peer_eids,
                        outcome: OperationOutcome::Failed { error },
                    });
                    log.record_failure(
                        Phase::EnforcedOptions,
                        Some(&local.chain),
                        "Aborting: remaining chains are skipped",
                    );
                    return;
                }
            }
        }
    }
}
