//! NumberDrop runner (default binary).
//!
//! Two modes:
//! - default: play a seeded headless demo game to game-over, printing the
//!   board and every merge event (handy for eyeballing cascade behavior)
//! - `serve`: run the leaderboard TCP server

use anyhow::Result;

use numberdrop::adapter::{run_server, ServerConfig};
use numberdrop::core::GameSession;
use numberdrop::types::{GameSettings, GRID_COLS, GRID_ROWS};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("serve") => serve(),
        Some(arg) => {
            let seed: u32 = arg.parse()?;
            demo(seed)
        }
        None => demo(1),
    }
}

fn serve() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(ServerConfig::from_env()))
}

/// Play a full game with a greedy column policy and print what happened.
fn demo(seed: u32) -> Result<()> {
    let mut session = GameSession::new(seed, GameSettings::default());
    let mut drops = 0u32;

    println!("seed {seed}");
    loop {
        let col = choose_column(&session);
        let value = session.next_value();
        let result = match session.drop_at(col) {
            Ok(result) => result,
            Err(rejection) => {
                // Greedy policy only picks legal columns; anything else
                // means the session is already terminal.
                println!("drop refused: {rejection:?}");
                break;
            }
        };
        drops += 1;

        println!("drop {drops}: {value} -> col {col}");
        for step in &result.steps {
            println!(
                "  combo {}: {} cells -> {} at ({}, {})",
                step.combo_index,
                step.merged_cells,
                step.new_value,
                step.anchor_col,
                step.anchor_row
            );
        }
        if result.score_delta > 0 {
            println!("  +{} (score {})", result.score_delta, session.score());
        }

        if result.game_over {
            break;
        }
    }

    println!("game over after {drops} drops");
    println!("final score {}, max block {}", session.score(), session.grid().max_value());
    print_board(&session);
    Ok(())
}

/// Prefer a column whose surface block equals the next value (instant
/// merge); otherwise the emptiest column.
fn choose_column(session: &GameSession) -> i8 {
    let grid = session.grid();
    let value = session.next_value();

    let mut best_col = 0i8;
    let mut best_depth = -1i8;
    for col in 0..GRID_COLS as i8 {
        let Some(row) = grid.lowest_empty_row(col) else {
            continue;
        };
        if grid.get(col, row + 1) == Some(Some(value)) {
            return col;
        }
        if row > best_depth {
            best_depth = row;
            best_col = col;
        }
    }
    best_col
}

fn print_board(session: &GameSession) {
    let grid = session.grid();
    for row in 0..GRID_ROWS as i8 {
        let mut line = String::new();
        for col in 0..GRID_COLS as i8 {
            match grid.get(col, row).flatten() {
                Some(value) => line.push_str(&format!("{value:>5}")),
                None => line.push_str("    ."),
            }
        }
        println!("{line}");
    }
}
