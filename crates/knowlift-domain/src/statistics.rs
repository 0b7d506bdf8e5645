//! Accuracy statistics

use crate::DomainError;
use serde::{Deserialize, Serialize};

/// Share of incorrect and correct answers, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Percentage of incorrect answers, two decimals
    pub incorrect_percentage: f64,
    /// Percentage of correct answers, two decimals
    pub correct_percentage: f64,
}

/// Compute accuracy percentages from answer counts
///
/// Both figures are rounded to two decimals and add up to 100. With no
/// answers at all the percentages are undefined and
/// [`DomainError::NoAnswers`] is returned.
///
/// # Examples
///
/// ```
/// use knowlift_domain::calculate_statistics;
///
/// let stats = calculate_statistics(3, 20).unwrap();
/// assert_eq!(stats.incorrect_percentage, 13.04);
/// assert_eq!(stats.correct_percentage, 86.96);
/// ```
pub fn calculate_statistics(incorrect: u32, correct: u32) -> Result<Statistics, DomainError> {
    let total = u64::from(incorrect) + u64::from(correct);
    if total == 0 {
        return Err(DomainError::NoAnswers);
    }

    let correct_percentage = round2(f64::from(correct) / total as f64 * 100.0);
    let incorrect_percentage = round2(100.0 - correct_percentage);

    Ok(Statistics {
        incorrect_percentage,
        correct_percentage,
    })
}

// Ties go to the even digit
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: percentages always add up to 100
        #[test]
        fn test_percentages_sum_to_hundred(incorrect in 0u32..100_000, correct in 0u32..100_000) {
            prop_assume!(incorrect + correct > 0);
            let stats = calculate_statistics(incorrect, correct).unwrap();
            prop_assert!((stats.incorrect_percentage + stats.correct_percentage - 100.0).abs() < 0.01);
            prop_assert!(stats.incorrect_percentage >= 0.0 && stats.correct_percentage >= 0.0);
        }
    }
}
