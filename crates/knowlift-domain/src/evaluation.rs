//! Answer evaluation
//!
//! Validates the round-trip payload in a fixed order and, if everything is
//! consistent, compares the player's answer with the true count:
//!
//! 1. every field is present
//! 2. glyphs are in the permitted set for their side
//! 3. representations match the internal values
//! 4. `stop > start`
//! 5. the answer is a strict integer
//!
//! The payload is not trusted to be the one issued at round start. Step 3
//! only catches a display string altered independently of its value.

use crate::format::prettify_number;
use crate::interval::{Interval, IntervalPayload, LeftGlyph, RightGlyph};
use crate::EvaluationError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Verdict on one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// The interval the answer was given for
    #[serde(flatten)]
    pub interval: Interval,
    /// Player's answer
    pub answer: i64,
    /// Correct count
    pub cpu_internal: i64,
    /// Correct count as displayed
    pub cpu_representation: String,
    /// Player's answer as displayed
    pub answer_representation: String,
    /// Whether the answer matched the count
    pub outcome: bool,
}

/// Evaluate a payload, reporting why it was rejected
pub fn try_evaluate(payload: &IntervalPayload) -> Result<EvaluationResult, EvaluationError> {
    let left_glyph = require(payload.left_glyph.as_deref(), "left_glyph")?;
    let right_glyph = require(payload.right_glyph.as_deref(), "right_glyph")?;
    let start = require(payload.start_internal, "start_internal")?;
    let stop = require(payload.stop_internal, "stop_internal")?;
    let start_representation =
        require(payload.start_representation.as_deref(), "start_representation")?;
    let stop_representation =
        require(payload.stop_representation.as_deref(), "stop_representation")?;
    let raw_answer = require(payload.answer.as_ref(), "answer")?;
    let game_level = require(payload.game_level, "game_level")?;

    let left_glyph = LeftGlyph::parse(left_glyph)
        .ok_or_else(|| EvaluationError::UnexpectedGlyph(left_glyph.to_string()))?;
    let right_glyph = RightGlyph::parse(right_glyph)
        .ok_or_else(|| EvaluationError::UnexpectedGlyph(right_glyph.to_string()))?;

    check_representation("start", start, start_representation)?;
    check_representation("stop", stop, stop_representation)?;

    if stop <= start {
        return Err(EvaluationError::InvalidOrdering { start, stop });
    }

    let answer = raw_answer
        .as_integer()
        .ok_or_else(|| EvaluationError::InvalidAnswer(raw_answer.to_string()))?;

    let interval = Interval::new(left_glyph, right_glyph, start, stop, game_level);
    let count = interval
        .count()
        .ok_or(EvaluationError::CountOverflow { start, stop })?;

    Ok(EvaluationResult {
        interval,
        answer,
        cpu_internal: count,
        cpu_representation: prettify_number(count),
        answer_representation: prettify_number(answer),
        outcome: answer == count,
    })
}

/// Evaluate a payload
///
/// Returns `None` for any malformed payload. The rejection is logged with a
/// `reason` field naming the failed check.
pub fn evaluate(payload: &IntervalPayload) -> Option<EvaluationResult> {
    match try_evaluate(payload) {
        Ok(result) => {
            debug!(
                count = result.cpu_internal,
                answer = result.answer,
                outcome = result.outcome,
                "Evaluated answer"
            );
            Some(result)
        }
        Err(e) => {
            error!(reason = e.category(), "{}", e);
            None
        }
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, EvaluationError> {
    value.ok_or(EvaluationError::MissingField(field))
}

fn check_representation(
    field: &'static str,
    internal: i64,
    representation: &str,
) -> Result<(), EvaluationError> {
    if prettify_number(internal) == representation {
        Ok(())
    } else {
        Err(EvaluationError::InconsistentRepresentation {
            field,
            internal,
            representation: representation.to_string(),
        })
    }
}
