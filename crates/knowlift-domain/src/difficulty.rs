//! Difficulty adaptation based on recent accuracy

use crate::LevelCatalog;
use tracing::info;

/// Margin of correct over incorrect answers (or the reverse) that moves the level
pub const LEVEL_CHANGE_MARGIN: u32 = 2;

/// Decision taken for the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAdjustment {
    /// Move one tier up
    Raise,
    /// Move one tier down
    Lower,
    /// Accuracy is within the margin
    Hold,
    /// A raise was earned but the level is already the hardest
    AtMaximum,
    /// A lowering was earned but the level is already the easiest
    AtMinimum,
}

impl LevelAdjustment {
    /// Level that results from applying this decision to `current`
    pub fn apply(&self, current: usize) -> usize {
        match self {
            LevelAdjustment::Raise => current + 1,
            LevelAdjustment::Lower => current - 1,
            LevelAdjustment::Hold | LevelAdjustment::AtMaximum | LevelAdjustment::AtMinimum => {
                current
            }
        }
    }
}

/// Decide how the level should move for the given window of answers
pub fn assess_level(
    catalog: &LevelCatalog,
    correct: u32,
    incorrect: u32,
    current: usize,
) -> LevelAdjustment {
    if correct >= incorrect.saturating_add(LEVEL_CHANGE_MARGIN) {
        if current < catalog.max_index() {
            LevelAdjustment::Raise
        } else {
            LevelAdjustment::AtMaximum
        }
    } else if incorrect >= correct.saturating_add(LEVEL_CHANGE_MARGIN) {
        if current > 0 {
            LevelAdjustment::Lower
        } else {
            LevelAdjustment::AtMinimum
        }
    } else {
        LevelAdjustment::Hold
    }
}

/// Next level for the given window of answers
///
/// Raises the level by one when correct answers lead by at least
/// [`LEVEL_CHANGE_MARGIN`], lowers it when incorrect answers do, and stays
/// put otherwise. The result never leaves the catalog.
pub fn change_level(catalog: &LevelCatalog, correct: u32, incorrect: u32, current: usize) -> usize {
    let adjustment = assess_level(catalog, correct, incorrect, current);

    match adjustment {
        LevelAdjustment::AtMaximum => info!("Maximum level reached"),
        LevelAdjustment::AtMinimum => info!("Minimum level reached"),
        _ => {}
    }

    adjustment.apply(current)
}
