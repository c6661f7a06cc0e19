use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::{log, SessionRng};
use super::broadcaster::GameBroadcaster;
use super::events::{GameEvent, GameOverSummary};
use super::game_state::SnakeGameState;
use super::settings::SnakeSessionSettings;
use super::types::{Direction, GamePhase};

/// Commands accepted between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    SetDirection(Direction),
    TogglePause,
    Reset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutcome {
    Finished(GameOverSummary),
    /// Every command sender was dropped before the game ended.
    Discarded,
}

pub struct SnakeSession;

impl SnakeSession {
    /// Drives one session until game over or until the command channel
    /// closes. The timer only runs while the phase is `Running`, and is
    /// rebuilt one full period out after a pause or a speed change.
    pub async fn run(
        settings: SnakeSessionSettings,
        mut rng: SessionRng,
        commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: impl GameBroadcaster,
    ) -> SessionOutcome {
        let state = SnakeGameState::new(settings, &mut rng);
        Self::drive(state, rng, commands, broadcaster).await
    }

    async fn drive(
        mut state: SnakeGameState,
        mut rng: SessionRng,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: impl GameBroadcaster,
    ) -> SessionOutcome {
        log!(
            "Session started (seed {}, tick {}ms)",
            rng.seed(),
            state.speed().as_millis()
        );
        broadcaster.broadcast_state(state.snapshot()).await;

        let mut timer = Self::start_timer(state.speed());

        loop {
            tokio::select! {
                _ = timer.tick(), if state.phase() == GamePhase::Running => {
                    let speed_before = state.speed();
                    let events = state.update(&mut rng);
                    broadcaster.broadcast_state(state.snapshot()).await;

                    let mut finished = None;
                    for event in events {
                        if let GameEvent::GameOver(summary) = &event {
                            finished = Some(summary.clone());
                        }
                        broadcaster.broadcast_event(event).await;
                    }
                    if let Some(summary) = finished {
                        return SessionOutcome::Finished(summary);
                    }

                    if state.speed() != speed_before {
                        timer = Self::start_timer(state.speed());
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        log!("Session discarded at tick {}", state.tick());
                        return SessionOutcome::Discarded;
                    };

                    match command {
                        SessionCommand::SetDirection(direction) => {
                            state.set_direction(direction);
                        }
                        SessionCommand::TogglePause => {
                            if let Some(phase) = state.toggle_pause() {
                                if phase == GamePhase::Running {
                                    timer = Self::start_timer(state.speed());
                                }
                                broadcaster.broadcast_state(state.snapshot()).await;
                            }
                        }
                        SessionCommand::Reset => {
                            let score_before = state.score();
                            state.reset(&mut rng);
                            log!("Session reset");
                            timer = Self::start_timer(state.speed());
                            broadcaster.broadcast_state(state.snapshot()).await;
                            if score_before != state.score() {
                                broadcaster
                                    .broadcast_event(GameEvent::ScoreChanged(state.score()))
                                    .await;
                            }
                        }
                    }
                }
            }
        }
    }

    fn start_timer(period: Duration) -> Interval {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }
}
