//! Spawn policy - decides which block values enter the board
//!
//! A fresh board only spawns 2s and 4s. Once the board's max value passes
//! the dynamic-drop threshold, the candidate pool widens to every power of
//! two up to `max / divisor`, with the divisor set by difficulty. Easy
//! additionally skews rolls toward the upper half of the pool, hard toward
//! the minimum. A two-deep lookahead queue lets the player see the current
//! and next block.

use arrayvec::ArrayVec;

use crate::core::grid::Grid;
use crate::core::rng::SimpleRng;
use crate::types::{
    Difficulty, GameSettings, DYNAMIC_DROP_THRESHOLD, EASY_UPPER_BIAS_PCT, HARD_MIN_BIAS_PCT,
    START_VALUES,
};

/// How many upcoming values the player can see (current + next)
pub const LOOKAHEAD: usize = 2;

/// Powers of two fit in well under 32 slots
type Candidates = ArrayVec<u32, 32>;

/// Candidate values for the current board state.
fn candidates(grid: &Grid, settings: &GameSettings) -> Candidates {
    let mut pool = Candidates::new();
    let max = grid.max_value();

    if settings.dynamic_drop && max > DYNAMIC_DROP_THRESHOLD {
        let ceiling = max / settings.difficulty.divisor();
        let mut value = 2u32;
        while value <= ceiling {
            pool.push(value);
            value *= 2;
        }
    }

    // Too early in the game (or dynamic drop off): the fixed start values.
    if pool.len() < 2 {
        pool.clear();
        pool.extend(START_VALUES);
    }

    pool
}

/// One roll against the pool, applying the difficulty bias.
fn roll(pool: &[u32], difficulty: Difficulty, rng: &mut SimpleRng) -> u32 {
    match difficulty {
        Difficulty::Easy if rng.next_percent() < EASY_UPPER_BIAS_PCT => {
            *rng.pick(&pool[pool.len() / 2..])
        }
        Difficulty::Hard if rng.next_percent() < HARD_MIN_BIAS_PCT => pool[0],
        _ => *rng.pick(pool),
    }
}

/// The spawn queue: the value about to drop plus one of lookahead.
///
/// `draw` pops the front and refills the back, so the pool is re-derived
/// from the board as it stood when the value entered the queue, not when
/// it drops. That is deliberate: the preview never changes under the
/// player's cursor.
#[derive(Debug, Clone)]
pub struct SpawnQueue {
    queue: ArrayVec<u32, LOOKAHEAD>,
}

impl SpawnQueue {
    /// Build a full queue for a fresh or loaded board.
    pub fn new(grid: &Grid, settings: &GameSettings, rng: &mut SimpleRng) -> Self {
        let mut queue = ArrayVec::new();
        let pool = candidates(grid, settings);
        for _ in 0..LOOKAHEAD {
            queue.push(roll(&pool, settings.difficulty, rng));
        }
        Self { queue }
    }

    /// Restore a queue from a saved game. Values outside the valid block
    /// domain are replaced by fresh rolls.
    pub fn from_saved(
        saved: &[u32],
        grid: &Grid,
        settings: &GameSettings,
        rng: &mut SimpleRng,
    ) -> Self {
        let pool = candidates(grid, settings);
        let mut queue = ArrayVec::new();
        for i in 0..LOOKAHEAD {
            let value = saved.get(i).copied().filter(|v| v.is_power_of_two() && *v >= 2);
            queue.push(value.unwrap_or_else(|| roll(&pool, settings.difficulty, rng)));
        }
        Self { queue }
    }

    /// The value that will drop next
    pub fn current(&self) -> u32 {
        self.queue[0]
    }

    /// The full visible queue, front first
    pub fn peek(&self) -> &[u32] {
        &self.queue
    }

    /// Pop the front value and roll a replacement from the current board.
    pub fn draw(&mut self, grid: &Grid, settings: &GameSettings, rng: &mut SimpleRng) -> u32 {
        let value = self.queue.remove(0);
        let pool = candidates(grid, settings);
        self.queue.push(roll(&pool, settings.difficulty, rng));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_max(max: u32) -> Grid {
        let mut grid = Grid::new();
        grid.set(0, 7, Some(max));
        grid
    }

    #[test]
    fn test_fresh_board_spawns_start_values_only() {
        let mut rng = SimpleRng::new(1);
        let grid = Grid::new();
        let settings = GameSettings::default();
        let mut queue = SpawnQueue::new(&grid, &settings, &mut rng);

        for _ in 0..200 {
            let value = queue.draw(&grid, &settings, &mut rng);
            assert!(START_VALUES.contains(&value));
        }
    }

    #[test]
    fn test_pool_stays_narrow_below_threshold() {
        let settings = GameSettings::default();
        let grid = grid_with_max(4);
        assert_eq!(candidates(&grid, &settings).as_slice(), &START_VALUES);
    }

    #[test]
    fn test_dynamic_pool_widens_with_board_max() {
        let settings = GameSettings::default(); // normal, divisor 8
        let grid = grid_with_max(128);
        // ceiling 128/8 = 16
        assert_eq!(candidates(&grid, &settings).as_slice(), &[2, 4, 8, 16]);
    }

    #[test]
    fn test_difficulty_divisor_shapes_pool() {
        let grid = grid_with_max(128);

        let easy = GameSettings {
            difficulty: Difficulty::Easy,
            ..GameSettings::default()
        };
        assert_eq!(candidates(&grid, &easy).as_slice(), &[2, 4, 8, 16, 32]);

        let hard = GameSettings {
            difficulty: Difficulty::Hard,
            ..GameSettings::default()
        };
        assert_eq!(candidates(&grid, &hard).as_slice(), &[2, 4, 8]);
    }

    #[test]
    fn test_dynamic_drop_off_keeps_start_values() {
        let settings = GameSettings {
            dynamic_drop: false,
            ..GameSettings::default()
        };
        let grid = grid_with_max(1024);
        assert_eq!(candidates(&grid, &settings).as_slice(), &START_VALUES);
    }

    #[test]
    fn test_narrow_dynamic_pool_falls_back_to_start_values() {
        // max 8 on hard: ceiling 8/16 = 0, pool would be empty
        let settings = GameSettings {
            difficulty: Difficulty::Hard,
            ..GameSettings::default()
        };
        let grid = grid_with_max(8);
        assert_eq!(candidates(&grid, &settings).as_slice(), &START_VALUES);
    }

    #[test]
    fn test_hard_bias_favors_minimum() {
        let settings = GameSettings {
            difficulty: Difficulty::Hard,
            ..GameSettings::default()
        };
        let grid = grid_with_max(512); // pool 2..32
        let mut rng = SimpleRng::new(77);
        let mut queue = SpawnQueue::new(&grid, &settings, &mut rng);

        let mut twos = 0;
        let total = 1000;
        for _ in 0..total {
            if queue.draw(&grid, &settings, &mut rng) == 2 {
                twos += 1;
            }
        }
        // 70% forced 2s plus uniform share; well above half
        assert!(twos > total / 2, "only {twos} of {total} were 2s");
    }

    #[test]
    fn test_easy_bias_favors_upper_half() {
        let settings = GameSettings {
            difficulty: Difficulty::Easy,
            ..GameSettings::default()
        };
        let grid = grid_with_max(512); // pool 2..128, upper half 16..128
        let mut rng = SimpleRng::new(78);
        let mut queue = SpawnQueue::new(&grid, &settings, &mut rng);

        let mut upper = 0;
        let total = 1000;
        for _ in 0..total {
            if queue.draw(&grid, &settings, &mut rng) >= 16 {
                upper += 1;
            }
        }
        assert!(upper > total / 2, "only {upper} of {total} were upper-half");
    }

    #[test]
    fn test_lookahead_is_stable_across_draws() {
        let mut rng = SimpleRng::new(9);
        let grid = Grid::new();
        let settings = GameSettings::default();
        let mut queue = SpawnQueue::new(&grid, &settings, &mut rng);

        let promised_next = queue.peek()[1];
        let _ = queue.draw(&grid, &settings, &mut rng);
        assert_eq!(queue.current(), promised_next);
        assert_eq!(queue.peek().len(), LOOKAHEAD);
    }

    #[test]
    fn test_from_saved_validates_values() {
        let mut rng = SimpleRng::new(3);
        let grid = Grid::new();
        let settings = GameSettings::default();

        let queue = SpawnQueue::from_saved(&[4, 2], &grid, &settings, &mut rng);
        assert_eq!(queue.peek(), &[4, 2]);

        // 3 is not a block value; 0-length input fills entirely from rolls
        let queue = SpawnQueue::from_saved(&[3], &grid, &settings, &mut rng);
        assert_eq!(queue.peek().len(), LOOKAHEAD);
        assert!(queue.peek().iter().all(|v| START_VALUES.contains(v)));
    }
}
