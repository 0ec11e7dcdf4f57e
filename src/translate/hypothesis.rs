/*!
 * Scored translation candidates.
 *
 * Every translation call produces a ranked list of hypotheses; the score is
 * log-probability-like, so higher (less negative) is better across the whole
 * crate.
 */

use std::cmp::Ordering;
use std::fmt;

/// One scored candidate translation
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    /// The candidate translated text
    pub value: String,

    /// Quality score, higher is better
    pub score: f64,
}

impl Hypothesis {
    /// Create a new hypothesis
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }

    /// Total-order comparison on score alone
    ///
    /// Uses `f64::total_cmp`, so NaN scores still order deterministically.
    /// Stable sorts keep insertion order on ties.
    pub fn cmp_by_score(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.score, self.value)
    }
}
