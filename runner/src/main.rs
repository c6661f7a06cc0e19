mod broadcaster;
mod high_score;

use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;

use snake_engine::config::{ConfigManager, SnakeConfig};
use snake_engine::snake::{
    BotController, BotType, GameEvent, SessionCommand, SessionOutcome, SnakeSession,
    SnakeSessionSettings,
};
use snake_engine::{log, logger, SessionRng};
use broadcaster::{ChannelBroadcaster, RunnerUpdate};
use high_score::HighScore;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BotKind {
    Efficient,
    Random,
}

impl From<BotKind> for BotType {
    fn from(kind: BotKind) -> Self {
        match kind {
            BotKind::Efficient => BotType::Efficient,
            BotKind::Random => BotType::Random,
        }
    }
}

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    #[arg(long, default_value = "snake_config.yaml")]
    config: String,
    #[arg(long, default_value_t = 1)]
    games: u32,
    /// Base seed; game `n` uses `seed + n`. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = BotKind::Efficient)]
    bot: BotKind,
    /// Games still running after this many ticks are discarded.
    #[arg(long, default_value_t = 2000)]
    max_ticks: u64,
    #[arg(long)]
    use_log_prefix: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = ConfigManager::<_, SnakeConfig, _>::from_yaml_file(&args.config).get_config()?;
    let settings = SnakeSessionSettings::from(&config);
    let base_seed = args.seed.unwrap_or_else(|| SessionRng::from_random().seed());
    let bot = BotType::from(args.bot);

    log!(
        "Running {} game(s) with {:?} bot, base seed {}",
        args.games,
        bot,
        base_seed
    );

    let mut high_score = HighScore::new();
    let mut finished = 0u32;

    for game in 0..args.games {
        let seed = base_seed.wrapping_add(game as u64);
        match play_game(game, settings.clone(), seed, bot, args.max_ticks).await? {
            SessionOutcome::Finished(summary) => {
                finished += 1;
                log!(
                    "[game {}] Over: score {}, length {}, {:?} after {} ticks",
                    game,
                    summary.final_score,
                    summary.length,
                    summary.reason,
                    summary.ticks
                );
                if high_score.record(summary.final_score) {
                    log!("[game {}] New high score: {}", game, summary.final_score);
                }
            }
            SessionOutcome::Discarded => {
                log!("[game {}] Discarded after {} ticks", game, args.max_ticks);
            }
        }
    }

    log!(
        "Done: {} of {} game(s) finished, high score {}",
        finished,
        args.games,
        high_score.best()
    );

    Ok(())
}

async fn play_game(
    game: u32,
    settings: SnakeSessionSettings,
    seed: u64,
    bot: BotType,
    max_ticks: u64,
) -> Result<SessionOutcome, tokio::task::JoinError> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    let session = tokio::spawn(SnakeSession::run(
        settings,
        SessionRng::new(seed),
        command_rx,
        ChannelBroadcaster::new(update_tx),
    ));

    let mut bot_rng = SessionRng::new(seed.wrapping_mul(31).wrapping_add(7));
    let mut command_tx = Some(command_tx);
    let mut updates = UnboundedReceiverStream::new(update_rx);

    // The stream ends once the session returns and drops its broadcaster.
    while let Some(update) = updates.next().await {
        match update {
            RunnerUpdate::State(snapshot) => {
                if snapshot.tick >= max_ticks {
                    // Dropping the sender makes the session discard itself.
                    command_tx = None;
                    continue;
                }
                if let Some(tx) = &command_tx
                    && let Some(direction) = BotController::calculate_move(bot, &snapshot, &mut bot_rng)
                    && direction != snapshot.direction
                    && tx.send(SessionCommand::SetDirection(direction)).is_err()
                {
                    command_tx = None;
                }
            }
            RunnerUpdate::Event(event) => log_event(game, &event),
        }
    }

    session.await
}

fn log_event(game: u32, event: &GameEvent) {
    match event {
        GameEvent::ScoreChanged(_) | GameEvent::GameOver(_) => {}
        GameEvent::ItemConsumed(item_type) => log!("[game {}] Ate {:?}", game, item_type),
        GameEvent::LifeLost { lives } => log!("[game {}] Life lost, {} left", game, lives),
        GameEvent::SpeedChanged(speed) => {
            log!("[game {}] Tick interval now {}ms", game, speed.as_millis())
        }
        GameEvent::WallsActivated { walls } => {
            log!("[game {}] {} hazard walls activated", game, walls.len())
        }
    }
}
