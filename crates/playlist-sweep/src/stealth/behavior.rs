//! Human-like pacing.

use rand::Rng;
use std::time::Duration;

/// Generate a random delay between min_ms and max_ms.
pub fn random_delay(min_ms: u64, max_ms: u64) -> Duration {
    if min_ms >= max_ms {
        return Duration::from_millis(min_ms);
    }
    let mut rng = rand::thread_rng();
    Duration::from_millis(rng.gen_range(min_ms..=max_ms))
}

/// Pause after the list becomes ready, before the first scroll (1.5-2.5s).
pub fn ready_pause() -> Duration {
    random_delay(1500, 2500)
}

/// Sleep for a ready pause.
pub async fn sleep_ready_pause() {
    tokio::time::sleep(ready_pause()).await;
}
