//! Pushes terminal updates to the clients subscribed to each feed.

use tokio::sync::broadcast::error::RecvError;
use tracing::{error, warn};

use crate::services::ScopedTask;
use crate::AppState;

/// Forward every periodic update to the matching feed room. Each message is
/// serialized once regardless of the number of subscribers.
pub fn start_fanout(state: &AppState) -> ScopedTask {
    let mut updates = state.terminal.subscribe();
    let rooms = state.room_manager.clone();

    ScopedTask::spawn("ws-fanout", async move {
        loop {
            let message = match updates.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "fan-out lagging behind terminal updates");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let Some(feed) = message.feed() else {
                continue;
            };

            match serde_json::to_string(&message) {
                Ok(json) => {
                    rooms.broadcast(feed, &json);
                }
                Err(e) => error!("Failed to serialize {} update: {}", feed, e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::Feed;
    use serde_json::Value;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_updates_reach_feed_subscribers() {
        let state = AppState::new(Config::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = state.room_manager.register(tx);
        state.room_manager.subscribe(id, &[Feed::Positions]);

        let fanout = start_fanout(&state);

        state.terminal.tick_quotes().await;
        state.terminal.close_position("1").await;

        let json = rx.recv().await.unwrap();
        let message: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(message["type"], "positions_update");
        assert_eq!(message["positions"]["totalProfitLoss"], 0.0);
        assert!(rx.try_recv().is_err());

        fanout.stop().await;
    }
}
