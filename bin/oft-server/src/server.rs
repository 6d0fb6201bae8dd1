use crate::{
    config::AppConfig, error::OftServerError, tools, RegistrySnafu, Result, ServeArgs,
    ServerBindSnafu, ServerStartSnafu, SignerSnafu,
};
use alloy::primitives::Address;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use oft_chains::{AlloySignerProvider, ChainRegistry, SignerProvider};
use oft_contracts::TokenArtifact;
use oft_models::{
    BridgeReceipt, BridgeRequest, DeploymentReport, DeploymentRequest, ToolResponse,
};
use oft_orchestrator::{BridgeOrchestrator, DeploymentOrchestrator};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChainRegistry>,
    pub deployer: Arc<DeploymentOrchestrator>,
    pub bridger: Arc<BridgeOrchestrator>,
}

impl AppState {
    pub fn new(
        registry: Arc<ChainRegistry>,
        signers: Arc<dyn SignerProvider>,
        token_artifact: Option<TokenArtifact>,
        default_owner: Address,
    ) -> Self {
        let deployer = DeploymentOrchestrator::new(
            registry.clone(),
            signers.clone(),
            token_artifact,
            default_owner,
        );
        let bridger = BridgeOrchestrator::new(registry.clone(), signers);
        Self {
            registry,
            deployer: Arc::new(deployer),
            bridger: Arc::new(bridger),
        }
    }

    /// Builds the registry and the alloy-backed signer from loaded configuration.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let registry = Arc::new(ChainRegistry::new(config.chains).context(RegistrySnafu)?);
        let signers =
            AlloySignerProvider::new(registry.clone(), &config.private_key).context(SignerSnafu)?;
        let default_owner = config.default_owner.unwrap_or_else(|| signers.address());
        info!(
            "Signing as {} on {:?}, default owner {}",
            signers.address(),
            registry.names(),
            default_owner
        );

        Ok(Self::new(
            registry,
            Arc::new(signers),
            config.token_artifact,
            default_owner,
        ))
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Status {
    pub status: String,
    pub version: String,
    pub chains: Vec<String>,
}

pub fn build_router(state: AppState, cors_domain: Option<&str>) -> Router {
    let router = Router::new()
        .route("/status", get(status_handler))
        .route("/tools", get(list_tools))
        .route(&format!("/tools/{}", tools::DEPLOY_TOOL), post(deploy_handler))
        .route(&format!("/tools/{}", tools::BRIDGE_TOOL), post(bridge_handler))
        .with_state(state);

    match cors_domain {
        Some(domain) => router.layer(cors_layer(domain)),
        None => router,
    }
}

pub async fn run_server(args: ServeArgs, state: AppState) -> Result<()> {
    info!("Starting OFT tool server...");
    let addr = SocketAddr::from((args.host, args.port));
    let app = build_router(state, args.cors_domain.as_deref());

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(ServerBindSnafu)?;

    axum::serve(listener, app).await.context(ServerStartSnafu)?;

    Ok(())
}

async fn status_handler(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains: state.registry.names(),
    })
}

async fn list_tools() -> Json<Vec<tools::ToolDescriptor>> {
    Json(tools::tool_descriptors())
}

async fn deploy_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DeploymentRequest>, JsonRejection>,
) -> std::result::Result<Json<ToolResponse<DeploymentReport>>, OftServerError> {
    let Json(request) = payload?;
    Ok(Json(tools::deploy_and_configure(&state.deployer, request).await))
}

async fn bridge_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BridgeRequest>, JsonRejection>,
) -> std::result::Result<Json<ToolResponse<BridgeReceipt>>, OftServerError> {
    let Json(request) = payload?;
    Ok(Json(tools::bridge(&state.bridger, request).await))
}

fn cors_layer(domain: &str) -> CorsLayer {
    let pattern = domain.to_string();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request| {
                origin
                    .to_str()
                    .map(|origin| origin_allowed(&pattern, origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Matches an `Origin` header against `*`, an exact host, or a `*.domain` wildcard.
fn origin_allowed(pattern: &str, origin: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    let host = origin.split_once("://").map_or(origin, |(_, rest)| rest);
    let host = host.split(':').next().unwrap_or(host);

    match pattern.strip_prefix("*.") {
        Some(domain) => host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.')),
        None => host == pattern || origin == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_matching() {
        assert!(origin_allowed("*", "https://anything.io"));
        assert!(origin_allowed("app.example.com", "https://app.example.com"));
        assert!(origin_allowed(
            "https://app.example.com",
            "https://app.example.com"
        ));
        assert!(!origin_allowed("app.example.com", "https://evil.com"));

        assert!(origin_allowed("*.example.com", "https://app.example.com"));
        assert!(origin_allowed("*.example.com", "http://a.b.example.com:8080"));
        assert!(!origin_allowed("*.example.com", "https://example.com"));
        assert!(!origin_allowed("*.example.com", "https://badexample.com"));
    }
}
