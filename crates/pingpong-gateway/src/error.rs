use alloy_primitives::B256;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("rpc call to provider '{provider}' failed: {source}")]
    Rpc {
        provider: String,
        #[source]
        source:   alloy_transport::TransportError
    },
    #[error("no providers are configured")]
    NoProvidersConfigured,
    #[error("fee data has not been refreshed yet")]
    FeeDataUnavailable,
    #[error("transaction {0} could not be decoded from the mempool response")]
    MalformedMempoolTransaction(B256),
    #[error("wallet signer error: {0}")]
    Signer(#[from] alloy_signer::Error),
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("unknown mempool provider '{0}'")]
    UnknownProvider(String)
}
