// Typo-Suggest Type Definitions
// Score sentinels, match outcomes and errors

use std::fmt;

use thiserror::Error;

use crate::context::CancelReason;

/// Lowest score an algorithm may produce, also used for "no match".
///
/// A finite stand-in for negative infinity so scores survive JSON and other
/// numeric encodings that cannot represent infinities.
pub const WORST_SCORE_VALUE: f64 = -(f32::MAX as f64);

/// Highest score an algorithm may produce, reserved for exact matches.
pub const BEST_SCORE_VALUE: f64 = f32::MAX as f64;

/// Result of a tie-aware scan
///
/// `exact` is true only when the input itself is in the corpus (or empty), in
/// which case `tie_set == [input]` and `score == BEST_SCORE_VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// All candidates sharing the highest score, in corpus order. Never empty.
    pub tie_set: Vec<String>,

    /// Score of every entry in `tie_set`
    pub score: f64,

    /// Whether the input was found verbatim
    pub exact: bool,
}

impl MatchOutcome {
    /// Outcome for an input that is a member of the corpus
    pub fn exact(input: &str) -> Self {
        Self {
            tie_set: vec![input.to_string()],
            score: BEST_SCORE_VALUE,
            exact: true,
        }
    }

    /// The low-confidence answer: the input itself with the worst score
    pub fn fallback(input: &str) -> Self {
        Self {
            tie_set: vec![input.to_string()],
            score: WORST_SCORE_VALUE,
            exact: false,
        }
    }

    /// First entry of the tie-set
    pub fn first(&self) -> &str {
        self.tie_set.first().map(String::as_str).unwrap_or_default()
    }

    /// More than one candidate shares the best score
    pub fn is_tie(&self) -> bool {
        self.tie_set.len() > 1
    }

    /// Collapse to a single suggestion, picking the first tied candidate
    pub fn into_suggestion(self) -> Suggestion {
        let value = self.tie_set.into_iter().next().unwrap_or_default();
        Suggestion {
            value,
            score: self.score,
            exact: self.exact,
        }
    }
}

/// A single suggested value
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub value: String,
    pub score: f64,
    pub exact: bool,
}

impl Suggestion {
    /// Create a non-exact suggestion
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
            exact: false,
        }
    }

    /// Mark the suggestion as exact
    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "{} (exact)", self.value)
        } else {
            write!(f, "{} ({:.4})", self.value, self.score)
        }
    }
}

/// Errors raised while building or querying a matcher or service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FinderError {
    #[error("no algorithm defined")]
    NoAlgorithm,

    #[error("prefix length {prefix} exceeds input length {input}")]
    PrefixTooLong { prefix: usize, input: usize },

    #[error(transparent)]
    Cancelled(#[from] CancelReason),

    #[error("unknown keyboard layout '{0}'")]
    UnknownLayout(String),

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FinderError {
    /// The caller's context fired
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FinderError::Cancelled(_))
    }
}

/// An interrupted operation that still produced a value
///
/// For the find family `partial` is the low-confidence fallback (the input
/// with the worst score); for prefix scans it holds the matches collected
/// before the interruption.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct Interrupted<T: fmt::Debug> {
    pub partial: T,
    pub reason: FinderError,
}

impl<T: fmt::Debug> Interrupted<T> {
    pub fn new(partial: T, reason: impl Into<FinderError>) -> Self {
        Self {
            partial,
            reason: reason.into(),
        }
    }

    /// Transform the carried value, keeping the reason
    pub fn map<U: fmt::Debug>(self, f: impl FnOnce(T) -> U) -> Interrupted<U> {
        Interrupted {
            partial: f(self.partial),
            reason: self.reason,
        }
    }

    pub fn into_parts(self) -> (T, FinderError) {
        (self.partial, self.reason)
    }
}
