use tokio::sync::mpsc;

use snake_engine::log;
use snake_engine::snake::{GameBroadcaster, GameEvent, GameSnapshot};

#[derive(Clone, Debug)]
pub enum RunnerUpdate {
    State(GameSnapshot),
    Event(GameEvent),
}

/// Forwards everything a session publishes onto a single channel, in order.
#[derive(Clone)]
pub struct ChannelBroadcaster {
    sender: mpsc::UnboundedSender<RunnerUpdate>,
}

impl ChannelBroadcaster {
    pub fn new(sender: mpsc::UnboundedSender<RunnerUpdate>) -> Self {
        Self { sender }
    }

    fn send(&self, update: RunnerUpdate) {
        if self.sender.send(update).is_err() {
            log!("Update receiver dropped, discarding update");
        }
    }
}

impl GameBroadcaster for ChannelBroadcaster {
    async fn broadcast_state(&self, snapshot: GameSnapshot) {
        self.send(RunnerUpdate::State(snapshot));
    }

    async fn broadcast_event(&self, event: GameEvent) {
        self.send(RunnerUpdate::Event(event));
    }
}
