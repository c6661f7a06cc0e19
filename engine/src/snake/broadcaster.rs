use std::future::Future;

use super::events::{GameEvent, GameSnapshot};

/// Outbound side of a session. Implementations forward to whatever renders
/// or scores the game; the session awaits them between ticks.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_event(&self, event: GameEvent) -> impl Future<Output = ()> + Send;
}
