use crate::display::{self, DisplaySink};
use crate::error::FetchError;
use crate::player::PlayerClient;
use std::time::Duration;
use tracing::{info, warn};

/// One poll cycle: fetch, reconcile, apply. On a fetch error the sink is not
/// called, so the previous display state stays on screen.
pub async fn run_once(
    player: &PlayerClient,
    sink: &mut dyn DisplaySink,
) -> Result<(), FetchError> {
    let state = player.fetch().await?;
    sink.apply(display::reconcile(state));
    Ok(())
}

/// Drive cycles until Ctrl-C. The delay is measured from the end of the
/// previous cycle, so cycles never overlap; each network call inside a cycle
/// is already bounded by the client timeout.
///
/// Per-cycle failures are logged and retried on the next tick. A credential
/// storage failure ends the loop: nothing can authenticate without the file.
pub async fn run(
    player: &PlayerClient,
    sink: &mut dyn DisplaySink,
    interval: Duration,
) -> Result<(), FetchError> {
    loop {
        match run_once(player, sink).await {
            Ok(()) => {}
            Err(e @ FetchError::Storage(_)) => return Err(e),
            Err(e @ FetchError::Refresh(_)) => {
                warn!("token refresh failed, will retry next cycle: {}", e)
            }
            Err(e) => warn!("playback fetch failed, keeping previous display: {}", e),
        }
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down poll loop");
                return Ok(());
            }
        }
    }
}
