//! Level catalog - difficulty tiers for interval generation

use crate::DomainError;
use serde::Serialize;
use std::num::IntErrorKind;
use tracing::error;

/// One difficulty tier
///
/// The bounds form the sampling envelope for interval endpoints drawn at
/// this tier. They are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameLevel {
    /// Human-readable difficulty name
    pub label: &'static str,
    /// Smallest value an endpoint may take
    pub lower: i64,
    /// Largest value an endpoint may take
    pub upper: i64,
}

impl GameLevel {
    /// Create a tier spanning `[lower, upper]`
    pub const fn new(label: &'static str, lower: i64, upper: i64) -> Self {
        Self { label, lower, upper }
    }

    /// Mean absolute value of an integer drawn uniformly from the tier
    pub fn mean_magnitude(&self) -> f64 {
        let lower = self.lower as f64;
        let upper = self.upper as f64;

        if self.lower >= 0 {
            (lower + upper) / 2.0
        } else if self.upper <= 0 {
            -(lower + upper) / 2.0
        } else {
            (lower * lower + upper * upper) / (2.0 * (upper - lower))
        }
    }
}

const STANDARD_LEVELS: [GameLevel; 11] = [
    GameLevel::new("very easy", 0, 10_i64.pow(1) - 1),
    GameLevel::new("very easy+", -(10_i64.pow(2) - 1), 10_i64.pow(2) - 1),
    GameLevel::new("easy", 0, 10_i64.pow(3) - 1),
    GameLevel::new("easy+", -(10_i64.pow(4) - 1), 10_i64.pow(4) - 1),
    GameLevel::new("normal", 0, 10_i64.pow(5) - 1),
    GameLevel::new("normal+", -(10_i64.pow(6) - 1), 10_i64.pow(6) - 1),
    GameLevel::new("hard", 0, 10_i64.pow(7) - 1),
    GameLevel::new("hard+", -(10_i64.pow(8) - 1), 10_i64.pow(8) - 1),
    GameLevel::new("very hard", 0, 10_i64.pow(9) - 1),
    GameLevel::new("very hard+", -(10_i64.pow(10) - 1), 10_i64.pow(10) - 1),
    GameLevel::new("impossible", 0, 10_i64.pow(11) - 1),
];

/// Ordered table of difficulty tiers, easiest first
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<GameLevel>,
}

impl LevelCatalog {
    /// Build a catalog from a list of tiers
    ///
    /// The table must be non-empty, every tier must satisfy
    /// `lower < upper`, no tier may appear twice, and the mean magnitude
    /// must strictly increase with the index.
    pub fn new(levels: Vec<GameLevel>) -> Result<Self, DomainError> {
        if levels.is_empty() {
            return Err(DomainError::InvalidCatalog("no levels defined".to_string()));
        }

        for (index, level) in levels.iter().enumerate() {
            if level.lower >= level.upper {
                return Err(DomainError::InvalidCatalog(format!(
                    "level {} has lower bound {} >= upper bound {}",
                    index, level.lower, level.upper
                )));
            }

            let duplicated = levels[..index]
                .iter()
                .any(|other| other.lower == level.lower && other.upper == level.upper);
            if duplicated {
                return Err(DomainError::InvalidCatalog(format!(
                    "level {} duplicates an earlier level",
                    index
                )));
            }
        }

        for (index, pair) in levels.windows(2).enumerate() {
            if pair[1].mean_magnitude() <= pair[0].mean_magnitude() {
                return Err(DomainError::InvalidCatalog(format!(
                    "level {} is not harder than level {}",
                    index + 1,
                    index
                )));
            }
        }

        Ok(Self { levels })
    }

    /// The eleven-tier catalog the game ships with
    ///
    /// Magnitudes run from 10^1 to 10^11; odd tiers include negative numbers.
    /// The table goes through the same validation as [`LevelCatalog::new`].
    pub fn standard() -> Result<Self, DomainError> {
        Self::new(STANDARD_LEVELS.to_vec())
    }

    /// Number of tiers
    pub fn tier_count(&self) -> usize {
        self.levels.len()
    }

    /// Index of the hardest tier
    pub fn max_index(&self) -> usize {
        self.levels.len() - 1
    }

    /// Bounds of the tier at `index`
    pub fn tier_bounds(&self, index: usize) -> Result<GameLevel, DomainError> {
        self.levels
            .get(index)
            .copied()
            .ok_or(DomainError::LevelOutOfRange {
                index,
                tier_count: self.levels.len(),
            })
    }

    /// All tiers in order
    pub fn levels(&self) -> &[GameLevel] {
        &self.levels
    }

    /// Resolve user input to a tier index
    ///
    /// Accepts only a strict integer (surrounding whitespace allowed) inside
    /// the catalog. Returns `None` otherwise; the log records whether the
    /// input failed to parse or fell outside the catalog.
    pub fn fetch_level(&self, raw: &str) -> Option<usize> {
        let index: i64 = match raw.trim().parse() {
            Ok(index) => index,
            // A well-formed integer too large for i64 is still outside the catalog
            Err(e)
                if matches!(
                    e.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                error!(
                    input = raw,
                    reason = "range",
                    "Unable to fetch the game level with index: {}",
                    raw.trim()
                );
                return None;
            }
            Err(e) => {
                error!(input = raw, reason = "parse", "Unable to parse game level: {}", e);
                return None;
            }
        };

        match usize::try_from(index) {
            Ok(index) if index < self.levels.len() => Some(index),
            _ => {
                error!(
                    index,
                    reason = "range",
                    "Unable to fetch the game level with index: {}",
                    index
                );
                None
            }
        }
    }
}
