//! Background deadline check for a payment link.

use std::sync::Arc;
use std::time::Duration;

use paylink_types::Clock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::session::PaymentSession;

/// Compare `clock` against the link deadline every
/// [`expiry_tick`](crate::SessionSettings::expiry_tick) until the session
/// completes or expires.
///
/// Returns a finished task straight away when the link has no deadline.
pub fn spawn_expiry_watch(session: Arc<PaymentSession>, clock: Arc<dyn Clock>) -> JoinHandle<()> {
    let period = session.settings().expiry_tick.max(Duration::from_millis(1));
    tokio::spawn(async move {
        let link_id = session.request().link_id.clone();
        if session.request().expires_at.is_none() {
            tracing::debug!(link_id = %link_id, "link has no deadline, expiry watch not started");
            return;
        }

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let state = session.tick(clock.now());
            if !state.can_expire() {
                tracing::debug!(link_id = %link_id, state = %state, "expiry watch stopped");
                break;
            }
        }
    })
}
