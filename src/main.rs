//! Match-3 Demo
//!
//! Headless run of the board engine: set up a board from a JSON config
//! (or defaults), play the swaps the engine itself finds, and log what
//! happened.
//!
//! Usage: `match3-demo [config.json]`

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use match3::{
    VERSION,
    game::{
        board::{Board, SwapOutcome},
        config::BoardConfig,
        events::{BoardEvent, RecordingSink},
    },
};

/// Swaps played by the demo.
const DEMO_SWAPS: usize = 10;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Match-3 engine v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            BoardConfig::from_json_str(&json).with_context(|| format!("loading config {}", path))?
        }
        None => BoardConfig::default().with_seed(12345),
    };

    demo_game(config)
}

/// Play a short scripted game.
fn demo_game(config: BoardConfig) -> Result<()> {
    info!("=== Setting up {}x{} board (seed {}) ===", config.width, config.height, config.seed);

    let mut board = Board::setup(config, RecordingSink::new())?;
    info!("Initial board:\n{}", board.grid());
    info!("Initial hash: {}", hex::encode(board.compute_hash()));

    for turn in 1..=DEMO_SWAPS {
        let Some(request) = board.find_swap() else {
            warn!("No moves left after {} swaps", turn - 1);
            break;
        };

        // Drive the swap through the same gesture a player would make
        board.handle_pointer_down(request.from);
        board.handle_pointer_enter(request.to);
        let outcome = board.handle_pointer_up()?;

        match outcome {
            Some(SwapOutcome::Resolved(report)) => {
                info!(
                    "Turn {}: {} -> {} cleared {} pieces in {} passes (+{} points, {} bombs dropped, {} detonated)",
                    turn,
                    request.from,
                    request.to,
                    report.pieces_cleared,
                    report.passes,
                    report.score_delta,
                    report.dropped_bombs.len(),
                    report.bombs_detonated,
                );
            }
            other => warn!("Turn {}: unexpected outcome {:?}", turn, other),
        }

        let events = board.sink_mut().take_events();
        let moves = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::PieceMoved { .. }))
            .count();
        let spawns = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::PieceSpawned { .. }))
            .count();
        info!("Turn {}: {} events ({} moves, {} spawns)", turn, events.len(), moves, spawns);
    }

    info!("=== Final Board ===");
    info!("\n{}", board.grid());
    info!("Score: {}", board.score());
    info!("Final State Hash: {}", hex::encode(board.compute_hash()));

    Ok(())
}
