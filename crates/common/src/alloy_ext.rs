use alloy::{
    network::EthereumWallet,
    primitives::B256,
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    pubsub::{ConnectionHandle, PubSubConnect},
    rpc::client::ClientBuilder,
    signers::local::PrivateKeySigner,
    transports::{impl_future, TransportResult},
};
use backoff::exponential::ExponentialBackoff;
use snafu::Snafu;
use tracing::debug;
use url::Url;

#[derive(Clone, Debug)]
pub struct RetryWsConnect(WsConnect);

impl PubSubConnect for RetryWsConnect {
    fn is_local(&self) -> bool {
        self.0.is_local()
    }

    fn connect(&self) -> impl_future!(<Output = TransportResult<ConnectionHandle>>) {
        self.0.connect()
    }

    async fn try_reconnect(&self) -> TransportResult<ConnectionHandle> {
        backoff::future::retry(
            ExponentialBackoff::<backoff::SystemClock>::default(),
            || async { Ok(self.0.try_reconnect().await?) },
        )
        .await
    }
}

#[derive(Debug, Snafu)]
pub enum ProviderError {
    #[snafu(display("Failed to create client: {}", source))]
    Client {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Failed to create local signer: {}", source))]
    LocalSigner {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("Invalid RPC URL: {}", url))]
    InvalidRpcUrl { url: String },
}

impl From<alloy::transports::RpcError<alloy::transports::TransportErrorKind>> for ProviderError {
    fn from(error: alloy::transports::RpcError<alloy::transports::TransportErrorKind>) -> Self {
        ProviderError::Client {
            source: Box::new(error),
        }
    }
}

pub fn is_websocket_url(rpc_url: &str) -> bool {
    rpc_url.starts_with("ws://") || rpc_url.starts_with("wss://")
}

/// Builds a signing provider for `rpc_url`, erased so callers need not name the filler stack.
///
/// HTTP endpoints connect lazily, so an unreachable node only shows up on the
/// first request. WebSocket endpoints connect here and reconnect with backoff.
pub async fn create_wallet_provider(
    rpc_url: &str,
    private_key: [u8; 32],
) -> Result<DynProvider, ProviderError> {
    let signer = PrivateKeySigner::from_bytes(&B256::from(private_key))
        .map_err(|e| ProviderError::LocalSigner { source: Box::new(e) })?;
    let wallet = EthereumWallet::new(signer);

    if is_websocket_url(rpc_url) {
        debug!("Connecting websocket provider to {}", rpc_url);
        let ws = RetryWsConnect(WsConnect::new(rpc_url));
        let client = ClientBuilder::default().pubsub(ws).await?;
        return Ok(ProviderBuilder::new()
            .wallet(wallet)
            .connect_client(client)
            .erased());
    }

    let url: Url = rpc_url.parse().map_err(|_| ProviderError::InvalidRpcUrl {
        url: rpc_url.to_string(),
    })?;
    Ok(ProviderBuilder::new().wallet(wallet).connect_http(url).erased())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_detection() {
        assert!(is_websocket_url("ws://localhost:8546"));
        assert!(is_websocket_url("wss://sepolia.example.org"));
        assert!(!is_websocket_url("https://sepolia.example.org"));
    }

    #[tokio::test]
    async fn test_http_provider_is_lazy() {
        // nothing listens here; building the provider must still succeed
        let provider = create_wallet_provider("http://127.0.0.1:1", [7u8; 32]).await;
        assert!(provider.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_and_key() {
        let invalid_url = create_wallet_provider("not a url", [7u8; 32]).await;
        assert!(matches!(invalid_url, Err(ProviderError::InvalidRpcUrl { .. })));

        let zero_key = create_wallet_provider("http://127.0.0.1:1", [0u8; 32]).await;
        assert!(matches!(zero_key, Err(ProviderError::LocalSigner { .. })));
    }
}
