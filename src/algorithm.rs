// Typo-Suggest Scoring Algorithms
// The pluggable scoring capability and the built-in metrics

use std::fmt;
use std::sync::Arc;

use crate::types::FinderError;

/// Scores how well `candidate` stands in for `input`
///
/// Higher is better. Scores must stay within
/// [`WORST_SCORE_VALUE`](crate::WORST_SCORE_VALUE) and
/// [`BEST_SCORE_VALUE`](crate::BEST_SCORE_VALUE); the best value is reserved
/// for exact matches. Implementations are called from many threads at once and
/// their latency bounds how quickly a scan reacts to cancellation.
pub trait Algorithm: Send + Sync {
    fn score(&self, input: &str, candidate: &str) -> f64;
}

impl<F> Algorithm for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn score(&self, input: &str, candidate: &str) -> f64 {
        self(input, candidate)
    }
}

/// Shared, immutable algorithm handle
#[derive(Clone)]
pub struct SharedAlgorithm(Arc<dyn Algorithm>);

impl SharedAlgorithm {
    pub fn new(alg: impl Algorithm + 'static) -> Self {
        Self(Arc::new(alg))
    }

    #[inline]
    pub fn score(&self, input: &str, candidate: &str) -> f64 {
        self.0.score(input, candidate)
    }
}

impl fmt::Debug for SharedAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedAlgorithm")
    }
}

/// Winkler's prefix scale
const PREFIX_SCALE: f64 = 0.1;

/// Plain Jaro similarity in [0, 1]
pub fn jaro() -> impl Algorithm {
    |a: &str, b: &str| strsim::jaro(a, b)
}

/// Jaro-Winkler with boost threshold 0.7 and a 4 character prefix
pub fn jaro_winkler_defaults() -> impl Algorithm {
    jaro_winkler(0.7, 4)
}

/// Jaro-Winkler similarity in [0, 1]
///
/// The common-prefix bonus only applies once the Jaro score exceeds
/// `boost_threshold`, and counts at most `prefix_len` characters.
pub fn jaro_winkler(boost_threshold: f64, prefix_len: usize) -> impl Algorithm {
    move |a: &str, b: &str| winkler(a, b, boost_threshold, prefix_len)
}

/// Jaro-Winkler whose prefix grows with long, equal-length inputs
///
/// Equal-length strings longer than 8 characters use a prefix of
/// `round(len / 1.5)`, which favours long references that share most of
/// their head with the input.
pub fn adaptive_jaro_winkler() -> impl Algorithm {
    |a: &str, b: &str| {
        let len = a.chars().count();
        let mut prefix_len = 4;
        if len == b.chars().count() && len > 8 {
            prefix_len = (len as f64 / 1.5).round() as usize;
        }
        winkler(a, b, 0.7, prefix_len)
    }
}

/// Negated optimal Damerau-Levenshtein distance
pub fn damerau_levenshtein() -> impl Algorithm {
    |a: &str, b: &str| -(strsim::damerau_levenshtein(a, b) as f64)
}

/// Negated Levenshtein distance
pub fn levenshtein() -> impl Algorithm {
    |a: &str, b: &str| -(strsim::levenshtein(a, b) as f64)
}

/// Resolve a configured algorithm name
pub fn by_name(name: &str) -> Result<SharedAlgorithm, FinderError> {
    let alg = match name.to_ascii_lowercase().as_str() {
        "jaro" => SharedAlgorithm::new(jaro()),
        "jaro-winkler" | "jarowinkler" => SharedAlgorithm::new(adaptive_jaro_winkler()),
        "jaro-winkler-defaults" => SharedAlgorithm::new(jaro_winkler_defaults()),
        "damerau-levenshtein" => SharedAlgorithm::new(damerau_levenshtein()),
        "levenshtein" => SharedAlgorithm::new(levenshtein()),
        _ => return Err(FinderError::UnknownAlgorithm(name.to_string())),
    };
    Ok(alg)
}

fn winkler(a: &str, b: &str, boost_threshold: f64, prefix_len: usize) -> f64 {
    let sim = strsim::jaro(a, b);
    if sim <= boost_threshold {
        return sim;
    }
    let common = a
        .chars()
        .zip(b.chars())
        .take(prefix_len)
        .take_while(|(x, y)| x == y)
        .count();
    sim + common as f64 * PREFIX_SCALE * (1.0 - sim)
}
