#[cfg(feature = "tracing")]
use tracing::{info, warn};
use {
    crate::{ClientOptions, RpcClient},
    ballot_types::{LedgerClient, ProbeStatus, RpcError},
};

/// Create a client for the first endpoint that answers a probe.
///
/// If none does, the client for the first valid endpoint is returned together
/// with its `Degraded` status; the vote flow will surface the failure later.
/// Errors only if no endpoint is a valid URL.
pub async fn connect_any<I, U>(
    endpoints: I,
    options: ClientOptions,
) -> Result<(RpcClient, ProbeStatus), RpcError>
where
    I: IntoIterator<Item = U>,
    U: AsRef<str>,
{
    let mut fallback = None;

    for endpoint in endpoints {
        let endpoint = endpoint.as_ref();

        let client = match RpcClient::with_options(endpoint, options) {
            Ok(client) => client,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                warn!(endpoint, err = %_err, "Skipping invalid RPC endpoint");
                continue;
            },
        };

        let status = client.probe().await;

        match &status {
            ProbeStatus::Ok { version: _version } => {
                #[cfg(feature = "tracing")]
                info!(endpoint, version = %_version, "Connected to RPC endpoint");
                return Ok((client, status));
            },
            ProbeStatus::Degraded { reason: _reason } => {
                #[cfg(feature = "tracing")]
                warn!(endpoint, reason = %_reason, "RPC endpoint failed probe");
            },
        }

        if fallback.is_none() {
            fallback = Some((client, status));
        }
    }

    fallback.ok_or_else(|| RpcError::Transport("no valid RPC endpoint configured".to_string()))
}
