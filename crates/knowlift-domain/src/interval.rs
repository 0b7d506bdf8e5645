//! Intervals and round generation

use crate::format::prettify_number;
use crate::{DomainError, LevelCatalog};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Notation on the left side of an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeftGlyph {
    /// `(` - the start bound is excluded
    #[serde(rename = "(")]
    Open,
    /// `[` - the start bound is included
    #[serde(rename = "[")]
    Closed,
}

impl LeftGlyph {
    /// Parse a glyph string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "(" => Some(LeftGlyph::Open),
            "[" => Some(LeftGlyph::Closed),
            _ => None,
        }
    }

    /// Glyph as shown to the player
    pub fn as_str(&self) -> &'static str {
        match self {
            LeftGlyph::Open => "(",
            LeftGlyph::Closed => "[",
        }
    }

    /// Whether the bound counts toward the total
    pub fn is_inclusive(&self) -> bool {
        matches!(self, LeftGlyph::Closed)
    }
}

/// Notation on the right side of an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RightGlyph {
    /// `)` - the stop bound is excluded
    #[serde(rename = ")")]
    Open,
    /// `]` - the stop bound is included
    #[serde(rename = "]")]
    Closed,
}

impl RightGlyph {
    /// Parse a glyph string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ")" => Some(RightGlyph::Open),
            "]" => Some(RightGlyph::Closed),
            _ => None,
        }
    }

    /// Glyph as shown to the player
    pub fn as_str(&self) -> &'static str {
        match self {
            RightGlyph::Open => ")",
            RightGlyph::Closed => "]",
        }
    }

    /// Whether the bound counts toward the total
    pub fn is_inclusive(&self) -> bool {
        matches!(self, RightGlyph::Closed)
    }
}

/// A question shown to the player
///
/// Built by [`start_round`] and handed back by the caller, together with the
/// player's answer, as an [`IntervalPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Left inclusion marker
    pub left_glyph: LeftGlyph,
    /// Right inclusion marker
    pub right_glyph: RightGlyph,
    /// Lower bound
    pub start_internal: i64,
    /// Upper bound, always greater than `start_internal`
    pub stop_internal: i64,
    /// Lower bound as displayed
    pub start_representation: String,
    /// Upper bound as displayed
    pub stop_representation: String,
    /// Tier the interval was drawn from
    pub game_level: usize,
}

impl Interval {
    /// Build an interval from its bounds, formatting the representations
    pub fn new(
        left_glyph: LeftGlyph,
        right_glyph: RightGlyph,
        start: i64,
        stop: i64,
        game_level: usize,
    ) -> Self {
        Self {
            left_glyph,
            right_glyph,
            start_internal: start,
            stop_internal: stop,
            start_representation: prettify_number(start),
            stop_representation: prettify_number(stop),
            game_level,
        }
    }

    /// Number of integers inside the interval
    ///
    /// `None` when the bounds are so far apart that the count overflows.
    pub fn count(&self) -> Option<i64> {
        let open = i128::from(self.stop_internal) - i128::from(self.start_internal) - 1;
        let count = open
            + i128::from(self.left_glyph.is_inclusive())
            + i128::from(self.right_glyph.is_inclusive());
        i64::try_from(count).ok()
    }

    /// Attach an answer, producing the record the client sends back
    pub fn into_payload(self, answer: RawAnswer) -> IntervalPayload {
        IntervalPayload {
            left_glyph: Some(self.left_glyph.as_str().to_string()),
            right_glyph: Some(self.right_glyph.as_str().to_string()),
            start_internal: Some(self.start_internal),
            stop_internal: Some(self.stop_internal),
            start_representation: Some(self.start_representation),
            stop_representation: Some(self.stop_representation),
            answer: Some(answer),
            game_level: Some(self.game_level),
        }
    }
}

/// Answer as it arrives from the client
///
/// Integers are taken as-is; strings must hold a strict integer. Floats are
/// accepted at deserialization only so they can be rejected with a proper
/// diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    /// JSON integer
    Integer(i64),
    /// JSON floating point number
    Float(f64),
    /// JSON string
    Text(String),
}

impl RawAnswer {
    /// Strict integer value of the answer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawAnswer::Integer(n) => Some(*n),
            RawAnswer::Float(_) => None,
            RawAnswer::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawAnswer::Integer(n) => write!(f, "{}", n),
            RawAnswer::Float(x) => write!(f, "{}", x),
            RawAnswer::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Round-trip record submitted with an answer
///
/// Every field is optional at the type level so that a missing field can be
/// reported by name. Unknown fields are rejected when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalPayload {
    /// Left inclusion marker
    pub left_glyph: Option<String>,
    /// Right inclusion marker
    pub right_glyph: Option<String>,
    /// Lower bound
    pub start_internal: Option<i64>,
    /// Upper bound
    pub stop_internal: Option<i64>,
    /// Lower bound as displayed
    pub start_representation: Option<String>,
    /// Upper bound as displayed
    pub stop_representation: Option<String>,
    /// Player's answer
    pub answer: Option<RawAnswer>,
    /// Tier the interval was drawn from
    pub game_level: Option<usize>,
}

/// Generate the next question for a tier
///
/// Glyphs are chosen uniformly among the four combinations. The two bounds
/// are distinct integers drawn uniformly from the tier envelope; the smaller
/// becomes the start.
pub fn start_round<R: Rng>(
    catalog: &LevelCatalog,
    level: usize,
    rng: &mut R,
) -> Result<Interval, DomainError> {
    let tier = catalog.tier_bounds(level)?;

    let left_glyph = if rng.random_bool(0.5) {
        LeftGlyph::Open
    } else {
        LeftGlyph::Closed
    };
    let right_glyph = if rng.random_bool(0.5) {
        RightGlyph::Open
    } else {
        RightGlyph::Closed
    };

    // Second draw skips the first value so the pair is distinct and uniform
    let first = rng.random_range(tier.lower..=tier.upper);
    let mut second = rng.random_range(tier.lower..tier.upper);
    if second >= first {
        second += 1;
    }

    let (start, stop) = if first < second {
        (first, second)
    } else {
        (second, first)
    };

    debug!(level, start, stop, "Generated interval");

    Ok(Interval::new(left_glyph, right_glyph, start, stop, level))
}
