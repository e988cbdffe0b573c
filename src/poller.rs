use crate::config::POLL_INTERVAL;
use crate::state::AppState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Background refresh loop: a tick every poll interval, plus an immediate
/// tick whenever the app state is woken (e.g. on becoming visible).
pub fn spawn(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = state.wake.notified() => {}
            }
            state.refresh_once().await;
        }
    })
}
