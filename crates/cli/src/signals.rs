#![forbid(unsafe_code)]

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Cancel `token` on the first ctrl-c. Returns early if the token is
/// cancelled by someone else.
pub async fn cancel_on_interrupt(token: CancellationToken) -> std::io::Result<()> {
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("interrupted, stopping simulations");
            token.cancel();
        }
        _ = token.cancelled() => {
            debug!("signal handler released");
        }
    }
    Ok(())
}
