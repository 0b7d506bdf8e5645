//! Knowlift Domain Layer
//!
//! This crate contains the interval counting game: the rules that decide how
//! many integers an interval holds, the difficulty tiers intervals are drawn
//! from, and the accuracy figures shown back to the player. It has no
//! knowledge of HTTP, sessions, or storage.
//!
//! ## Key Concepts
//!
//! - **Game Level**: a difficulty tier biasing the magnitude of the bounds
//! - **Interval**: two integer bounds plus an inclusion glyph on each side
//! - **Representation**: the digit-grouped display form of an integer
//! - **Evaluation**: the verdict on a player's answer for one interval
//!
//! ## Architecture
//!
//! Every operation is a pure function of its explicit inputs. Counters and
//! the current level live with the caller and are passed in on each call;
//! the only nondeterminism is the random source handed to
//! [`start_round`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod difficulty;
pub mod error;
pub mod evaluation;
pub mod format;
pub mod interval;
pub mod level;
pub mod statistics;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use difficulty::{assess_level, change_level, LevelAdjustment};
pub use error::{DomainError, EvaluationError};
pub use evaluation::{evaluate, try_evaluate, EvaluationResult};
pub use format::{parse_representation, prettify_number};
pub use interval::{start_round, Interval, IntervalPayload, LeftGlyph, RawAnswer, RightGlyph};
pub use level::{GameLevel, LevelCatalog};
pub use statistics::{calculate_statistics, Statistics};
