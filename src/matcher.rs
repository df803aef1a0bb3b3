// Typo-Suggest Matcher
// Cancellable scan that scores every candidate and keeps the best tie-set

use tracing::trace;

use crate::algorithm::{Algorithm, SharedAlgorithm};
use crate::context::Context;
use crate::corpus::Corpus;
use crate::types::{FinderError, Interrupted, MatchOutcome, Suggestion, WORST_SCORE_VALUE};

/// Finds the best matching reference(s) for a possibly misspelled input
///
/// Safe to share between threads: every call works on one generation of the
/// corpus, and [`Matcher::refresh`] swaps generations atomically.
///
/// # Example
/// ```
/// # use typo_suggest::Matcher;
/// let matcher = Matcher::builder()
///     .with_algorithm(typo_suggest::algorithm::jaro_winkler_defaults())
///     .with_length_tolerance(0.2)
///     .build(["gmail.com", "hotmail.com"])
///     .unwrap();
///
/// let suggestion = matcher.find("gmial.com");
/// assert_eq!(suggestion.value, "gmail.com");
/// assert!(!suggestion.exact);
/// ```
pub struct Matcher {
    corpus: Corpus,
    algorithm: SharedAlgorithm,
    length_tolerance: f64,
}

/// Options for [`Matcher`]; an algorithm is mandatory
#[derive(Debug, Default)]
pub struct MatcherBuilder {
    algorithm: Option<SharedAlgorithm>,
    length_tolerance: f64,
    prefix_buckets: bool,
}

impl MatcherBuilder {
    /// Scoring algorithm, fixed for the lifetime of the matcher
    pub fn with_algorithm(self, alg: impl Algorithm + 'static) -> Self {
        self.with_shared_algorithm(SharedAlgorithm::new(alg))
    }

    pub fn with_shared_algorithm(mut self, alg: SharedAlgorithm) -> Self {
        self.algorithm = Some(alg);
        self
    }

    /// Skip candidates whose length differs too much from the input
    ///
    /// With tolerance `t` a candidate of length `r` is scored only when
    /// `r - ceil(len * t) <= len <= r + ceil(len * t)`. `t <= 0` disables the
    /// filter; `t > 1` is degenerate and only lets equal lengths through.
    pub fn with_length_tolerance(mut self, tolerance: f64) -> Self {
        self.length_tolerance = tolerance;
        self
    }

    /// Only scan references sharing the input's first character
    ///
    /// Much smaller scans, at the cost of never correcting a wrong first
    /// character (unless no reference starts with it).
    pub fn with_prefix_buckets(mut self, enabled: bool) -> Self {
        self.prefix_buckets = enabled;
        self
    }

    /// Build the matcher over `list`
    ///
    /// # Errors
    /// [`FinderError::NoAlgorithm`] when no algorithm was configured.
    pub fn build<I, S>(self, list: I) -> Result<Matcher, FinderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let algorithm = self.algorithm.ok_or(FinderError::NoAlgorithm)?;
        Ok(Matcher {
            corpus: Corpus::new(list, self.prefix_buckets),
            algorithm,
            length_tolerance: self.length_tolerance,
        })
    }
}

impl Matcher {
    pub fn builder() -> MatcherBuilder {
        MatcherBuilder::default()
    }

    /// Best suggestion for `input`, picking arbitrarily among ties
    pub fn find(&self, input: &str) -> Suggestion {
        match self.find_ctx(&Context::background(), input) {
            Ok(suggestion) => suggestion,
            Err(interrupted) => interrupted.partial,
        }
    }

    /// Best suggestion for `input` under `ctx`, picking arbitrarily among ties
    ///
    /// Use [`Matcher::find_top_ranking_ctx`] with a tie-breaker when the
    /// choice between equally scored candidates matters.
    pub fn find_ctx(
        &self,
        ctx: &Context,
        input: &str,
    ) -> Result<Suggestion, Interrupted<Suggestion>> {
        self.find_top_ranking_ctx(ctx, input)
            .map(MatchOutcome::into_suggestion)
            .map_err(|e| e.map(MatchOutcome::into_suggestion))
    }

    /// All candidates sharing the best score, in corpus order
    pub fn find_top_ranking_ctx(
        &self,
        ctx: &Context,
        input: &str,
    ) -> Result<MatchOutcome, Interrupted<MatchOutcome>> {
        self.find_top_ranking_prefix_ctx(ctx, input, 0)
    }

    /// Like [`Matcher::find_top_ranking_ctx`], restricted by a prefix
    ///
    /// With `prefix_len > 0` only candidates at least `prefix_len` characters
    /// long whose first `prefix_len - 1` characters equal the input's are
    /// scored.
    ///
    /// On error the [`Interrupted`] carries the fallback outcome: the input
    /// itself with [`WORST_SCORE_VALUE`]. Progress made before a cancellation
    /// is discarded.
    pub fn find_top_ranking_prefix_ctx(
        &self,
        ctx: &Context,
        input: &str,
        prefix_len: usize,
    ) -> Result<MatchOutcome, Interrupted<MatchOutcome>> {
        let input_len = input.chars().count();
        if prefix_len > 0 && input_len < prefix_len {
            return Err(Interrupted::new(
                MatchOutcome::fallback(input),
                FinderError::PrefixTooLong {
                    prefix: prefix_len,
                    input: input_len,
                },
            ));
        }

        // Held until the scan is done, so a refresh cannot land mid-scan.
        let view = self.corpus.read();

        if input.is_empty() || view.contains(input) {
            return Ok(MatchOutcome::exact(input));
        }

        let head: Vec<char> = input.chars().take(prefix_len.saturating_sub(1)).collect();
        let mut best = WORST_SCORE_VALUE;
        let mut tie_set = vec![input.to_string()];

        for candidate in view.candidates(input) {
            if let Some(reason) = ctx.err() {
                trace!(input, %reason, "scan interrupted");
                return Err(Interrupted::new(MatchOutcome::fallback(input), reason));
            }

            if prefix_len > 0 && !shares_prefix(candidate, &head, prefix_len) {
                continue;
            }

            if !within_tolerance(input_len, candidate.chars().count(), self.length_tolerance) {
                continue;
            }

            let score = self.algorithm.score(input, candidate);
            if score > best {
                best = score;
                tie_set.clear();
                tie_set.push(candidate.clone());
            } else if score == best {
                tie_set.push(candidate.clone());
            }
        }

        Ok(MatchOutcome {
            tie_set,
            score: best,
            exact: false,
        })
    }

    /// Whether `input` is a reference verbatim
    pub fn exact(&self, input: &str) -> bool {
        self.corpus.exact(input)
    }

    /// References starting with `prefix`; see [`Corpus::get_matching_prefix`]
    pub fn get_matching_prefix(
        &self,
        ctx: &Context,
        prefix: &str,
        max: usize,
    ) -> Result<Vec<String>, Interrupted<Vec<String>>> {
        self.corpus.get_matching_prefix(ctx, prefix, max)
    }

    /// Replace the reference list
    pub fn refresh<I, S>(&self, list: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.corpus.refresh(list);
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn length_tolerance(&self) -> f64 {
        self.length_tolerance
    }

    pub fn prefix_buckets(&self) -> bool {
        self.corpus.prefix_buckets()
    }
}

/// Candidate is long enough and starts with `head`
fn shares_prefix(candidate: &str, head: &[char], prefix_len: usize) -> bool {
    let mut chars = candidate.chars();
    for expected in head {
        if chars.next() != Some(*expected) {
            return false;
        }
    }
    // The head matched; the candidate still needs prefix_len characters.
    head.len() + chars.count() >= prefix_len
}

/// Length pre-filter, anchored to the input length
fn within_tolerance(input_len: usize, ref_len: usize, tolerance: f64) -> bool {
    if tolerance <= 0.0 {
        return true;
    }
    if tolerance > 1.0 {
        return input_len == ref_len;
    }
    let threshold = (input_len as f64 * tolerance).ceil() as usize;
    ref_len.saturating_sub(threshold) <= input_len && input_len <= ref_len + threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancelReason;

    fn constant(score: f64) -> impl Algorithm {
        move |_: &str, _: &str| score
    }

    /// Scores by shared leading characters
    fn common_prefix() -> impl Algorithm {
        |a: &str, b: &str| a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count() as f64
    }

    #[test]
    fn test_build_requires_algorithm() {
        let err = Matcher::builder().build(["a"]).err().unwrap();
        assert_eq!(err, FinderError::NoAlgorithm);
    }

    #[test]
    fn test_exact_and_empty_input() {
        let matcher = Matcher::builder()
            .with_algorithm(constant(1.0))
            .build(["beer"])
            .unwrap();
        let ctx = Context::background();

        assert_eq!(
            matcher.find_top_ranking_ctx(&ctx, "beer").unwrap(),
            MatchOutcome::exact("beer")
        );
        assert_eq!(
            matcher.find_top_ranking_ctx(&ctx, "").unwrap(),
            MatchOutcome::exact("")
        );
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let matcher = Matcher::builder()
            .with_algorithm(common_prefix())
            .build(["bean", "beef", "boat", "beer"])
            .unwrap();

        let outcome = matcher
            .find_top_ranking_ctx(&Context::background(), "bee5")
            .unwrap();
        assert_eq!(outcome.tie_set, vec!["beef", "beer"]);
        assert_eq!(outcome.score, 3.0);
        assert!(!outcome.exact);
    }

    #[test]
    fn test_higher_score_resets_ties() {
        let matcher = Matcher::builder()
            .with_algorithm(common_prefix())
            .build(["b", "bo", "be", "bee"])
            .unwrap();

        let outcome = matcher
            .find_top_ranking_ctx(&Context::background(), "beef")
            .unwrap();
        assert_eq!(outcome.tie_set, vec!["bee"]);
    }

    #[test]
    fn test_empty_corpus_returns_input() {
        let matcher = Matcher::builder()
            .with_algorithm(constant(1.0))
            .build(Vec::<String>::new())
            .unwrap();

        let outcome = matcher
            .find_top_ranking_ctx(&Context::background(), "beer")
            .unwrap();
        assert_eq!(outcome.tie_set, vec!["beer"]);
        assert_eq!(outcome.score, WORST_SCORE_VALUE);
        assert!(matcher.is_empty());
    }

    #[test]
    fn test_prefix_too_long() {
        let matcher = Matcher::builder()
            .with_algorithm(constant(1.0))
            .build(["beer"])
            .unwrap();

        let err = matcher
            .find_top_ranking_prefix_ctx(&Context::background(), "be", 3)
            .unwrap_err();
        assert_eq!(err.reason, FinderError::PrefixTooLong { prefix: 3, input: 2 });
        assert_eq!(err.partial, MatchOutcome::fallback("be"));
    }

    #[test]
    fn test_prefix_filter() {
        let matcher = Matcher::builder()
            .with_algorithm(constant(1.0))
            .build(["bo", "bear", "bee", "cheer", "be"])
            .unwrap();

        // Candidates need 3 characters and the input's first 2
        let outcome = matcher
            .find_top_ranking_prefix_ctx(&Context::background(), "bex", 3)
            .unwrap();
        assert_eq!(outcome.tie_set, vec!["bear", "bee"]);
    }

    #[test]
    fn test_cancelled_scan_discards_progress() {
        let matcher = Matcher::builder()
            .with_algorithm(constant(1.0))
            .build(["beef", "beer"])
            .unwrap();
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        let err = matcher.find_top_ranking_ctx(&ctx, "bee5").unwrap_err();
        assert_eq!(err.reason, FinderError::Cancelled(CancelReason::Cancelled));
        assert_eq!(err.partial, MatchOutcome::fallback("bee5"));

        let suggestion = matcher.find_ctx(&ctx, "bee5").unwrap_err().partial;
        assert_eq!(suggestion.value, "bee5");
    }

    #[test]
    fn test_exact_lookup_ignores_cancellation() {
        let matcher = Matcher::builder()
            .with_algorithm(constant(1.0))
            .build(["beer"])
            .unwrap();
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        assert!(matcher.find_ctx(&ctx, "beer").unwrap().exact);
    }

    #[test]
    fn test_buckets_require_first_character() {
        let matcher = Matcher::builder()
            .with_algorithm(common_prefix())
            .with_prefix_buckets(true)
            .build(["gmail.com", "hotmail.com"])
            .unwrap();

        // 'h' bucket only holds hotmail.com
        assert_eq!(matcher.find("hmail.com").value, "hotmail.com");
        // No 'x' bucket: the whole list is scanned
        assert_eq!(matcher.find("xmail.com").value, "gmail.com");
        assert!(matcher.prefix_buckets());
    }

    #[test]
    fn test_within_tolerance() {
        // ceil(8 * 0.2) = 2
        assert!(within_tolerance(8, 6, 0.2));
        // ceil(12 * 0.2) = 3
        assert!(!within_tolerance(12, 6, 0.2));
        assert!(within_tolerance(5, 6, 0.2));
        assert!(!within_tolerance(4, 6, 0.2));
        assert!(!within_tolerance(3, 6, 0.2));

        // disabled
        assert!(within_tolerance(1, 100, 0.0));
        assert!(within_tolerance(1, 100, -1.0));

        // degenerate
        assert!(within_tolerance(6, 6, 1.5));
        assert!(!within_tolerance(7, 6, 1.5));
    }

    #[test]
    fn test_shares_prefix() {
        let head: Vec<char> = "ab".chars().collect();
        assert!(shares_prefix("abc", &head, 3));
        assert!(shares_prefix("abzzz", &head, 3));
        assert!(!shares_prefix("ab", &head, 3));
        assert!(!shares_prefix("axc", &head, 3));
        assert!(shares_prefix("x", &[], 1));
        assert!(!shares_prefix("", &[], 1));
    }
}
