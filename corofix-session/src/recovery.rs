/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session supervisor: reconnection with capped exponential backoff.

use crate::handler::SessionHandler;
use crate::session::Session;
use corofix_core::error::SessionError;
use corofix_coro::yield_now;
use corofix_transport::Transport;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Backoff ceiling in seconds.
const MAX_BACKOFF_SECS: u64 = 60;

/// Runs the session and, on failure, retries with exponential backoff.
///
/// A graceful return stops the loop immediately. Each failed attempt sleeps
/// `base * 2^attempt` seconds (capped at 60) via cooperative yields before
/// reconnecting. When `max_reconnect_attempts` is exhausted the last error
/// is returned.
///
/// # Errors
/// Returns the final session error once retries are exhausted.
pub async fn session_with_recovery<H: SessionHandler, T: Transport>(
    session: &Session<'_, H, T>,
    host: &str,
    port: u16,
) -> Result<(), SessionError> {
    let config = session.config();
    let mut attempts: u32 = 0;

    loop {
        match session.run(host, port).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                attempts += 1;
                if attempts >= config.max_reconnect_attempts {
                    warn!(attempts, %err, "reconnect attempts exhausted");
                    return Err(err);
                }

                let base = config.reconnect_interval.as_secs();
                let delay_secs = base
                    .saturating_mul(1u64 << attempts.min(63))
                    .min(MAX_BACKOFF_SECS);
                info!(attempt = attempts, delay_secs, %err, "reconnecting after backoff");

                let deadline = Instant::now() + Duration::from_secs(delay_secs);
                while Instant::now() < deadline {
                    yield_now().await;
                }
            }
        }
    }
}
