//! Merge resolver - runs a full cascade to quiescence
//!
//! A cascade starts from an anchor cell (the block that just landed or was
//! just placed). The anchor's flood-fill group merges, gravity settles the
//! board, and the survivor block becomes the next anchor. When the anchor
//! chain dies out, an optional whole-board fallback scan picks up merges the
//! anchor never touched (two far-apart pairs brought together by gravity).
//!
//! After gravity the survivor may have fallen, so it is re-located by
//! scanning its column top-down for the doubled value. Only one block
//! survives each commit, so the scan is unambiguous; a coincidental equal
//! value higher in the column would only shift which of two interchangeable
//! blocks continues the chain.

use crate::core::grid::Grid;
use crate::core::scoring;
use crate::types::GameSettings;

/// One committed merge inside a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep {
    /// Value of the block the merge produced
    pub new_value: u32,
    /// Where the survivor sat at commit time (before gravity)
    pub anchor_col: i8,
    pub anchor_row: i8,
    /// How many cells the group consumed (>= 2)
    pub merged_cells: usize,
    /// 1-based position of this step in the cascade
    pub combo_index: u32,
}

/// Outcome of a full cascade.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeResult {
    pub steps: Vec<MergeStep>,
    pub score_delta: u64,
}

impl CascadeResult {
    /// Number of merge steps (the final combo count)
    pub fn combo(&self) -> u32 {
        self.steps.len() as u32
    }

    /// Largest block value produced, if any merge happened
    pub fn max_value(&self) -> Option<u32> {
        self.steps.iter().map(|s| s.new_value).max()
    }
}

/// Run the cascade starting from the block at (col, row) until no merge
/// remains. Gravity is applied after every commit; the grid is quiescent
/// on return (settled, no mergeable anchor group, and with chain merges
/// enabled no mergeable group anywhere).
pub fn resolve_cascade(
    grid: &mut Grid,
    col: i8,
    row: i8,
    settings: &GameSettings,
) -> CascadeResult {
    let mut result = CascadeResult::default();
    let mut anchor = Some((col, row));

    loop {
        let group = match anchor {
            Some((c, r)) => grid.find_merge_group_from(c, r),
            // Anchor chain exhausted: whole-board fallback, bottom-up.
            None if settings.chain_merge => grid.find_any_merge_group(),
            None => None,
        };

        let Some(group) = group else {
            if anchor.take().is_some() {
                // Retry once through the fallback arm before giving up.
                continue;
            }
            break;
        };

        let new_value = grid.commit_merge(&group);
        grid.apply_gravity();

        let combo_index = result.steps.len() as u32 + 1;
        result.score_delta = result
            .score_delta
            .saturating_add(scoring::merge_score(new_value, combo_index));
        result.steps.push(MergeStep {
            new_value,
            anchor_col: group.anchor_col,
            anchor_row: group.anchor_row,
            merged_cells: group.len(),
            combo_index,
        });

        // Gravity may have moved the survivor; find it again in its column.
        anchor = grid
            .find_value_in_col(group.anchor_col, new_value)
            .map(|r| (group.anchor_col, r));
    }

    if grid.heal_floating_blocks() {
        log::warn!("floating blocks after cascade, re-applied gravity");
    }

    result
}
