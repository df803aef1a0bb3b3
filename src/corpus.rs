// Typo-Suggest Corpus
// Reference list, membership index and first-character buckets

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::context::Context;
use crate::rwlock::{RwcLock, RwcReadGuard};
use crate::types::Interrupted;

/// One generation of the reference data
///
/// The list, the membership set and the buckets are always built together and
/// swapped in together, so a reader holding a view sees one generation.
#[derive(Debug, Default)]
pub struct CorpusView {
    /// References in scan order
    list: Vec<String>,

    /// Exact membership, O(1)
    members: FxHashSet<String>,

    /// Leading character → references starting with it, in list order.
    /// Empty unless bucketing is enabled; empty strings are never bucketed.
    buckets: FxHashMap<char, Vec<String>>,

    bucketed: bool,
}

impl CorpusView {
    fn build<I, S>(list: I, bucketed: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = list.into_iter().map(Into::into).collect();
        let mut members = FxHashSet::default();
        members.reserve(list.len());
        let mut buckets: FxHashMap<char, Vec<String>> = FxHashMap::default();

        for reference in &list {
            members.insert(reference.clone());
            if !bucketed {
                continue;
            }
            if let Some(first) = reference.chars().next() {
                buckets.entry(first).or_default().push(reference.clone());
            }
        }

        Self {
            list,
            members,
            buckets,
            bucketed,
        }
    }

    /// Whether `input` is a reference verbatim
    pub fn contains(&self, input: &str) -> bool {
        self.members.contains(input)
    }

    /// References worth scanning for `input`
    ///
    /// With bucketing enabled this is the bucket of the input's first
    /// character when it exists, otherwise the whole list.
    pub fn candidates(&self, input: &str) -> &[String] {
        if self.bucketed {
            if let Some(bucket) = input.chars().next().and_then(|c| self.buckets.get(&c)) {
                return bucket;
            }
        }
        &self.list
    }

    /// All references in scan order
    pub fn list(&self) -> &[String] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Number of first-character buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// The reference set searched by one matcher
///
/// Only ever replaced wholesale through [`Corpus::refresh`].
pub struct Corpus {
    index: RwcLock<CorpusView>,
    prefix_buckets: bool,
}

impl Corpus {
    /// Build a corpus, optionally indexing references by their first character
    pub fn new<I, S>(list: I, prefix_buckets: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let corpus = Self {
            index: RwcLock::new(CorpusView::default()),
            prefix_buckets,
        };
        corpus.refresh(list);
        corpus
    }

    /// Replace the whole reference set
    ///
    /// The new generation is built before the write lock is taken; readers
    /// see either the old or the new generation, never a mix.
    pub fn refresh<I, S>(&self, list: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fresh = CorpusView::build(list, self.prefix_buckets);
        let (references, buckets) = (fresh.len(), fresh.bucket_count());

        let previous = std::mem::replace(&mut *self.index.write(), fresh);
        drop(previous);

        debug!(references, buckets, "corpus refreshed");
    }

    /// Hold the current generation for the lifetime of the guard
    ///
    /// A pending refresh waits until the guard is dropped.
    pub fn read(&self) -> RwcReadGuard<'_, CorpusView> {
        self.index.read()
    }

    /// Whether `input` is a reference verbatim
    pub fn exact(&self, input: &str) -> bool {
        self.read().contains(input)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn prefix_buckets(&self) -> bool {
        self.prefix_buckets
    }

    /// References that start with `prefix`, in corpus order
    ///
    /// Stops after `max` matches (`0` means no limit). Cancellation is polled
    /// before every candidate; an interrupted scan hands back the matches it
    /// already found.
    pub fn get_matching_prefix(
        &self,
        ctx: &Context,
        prefix: &str,
        max: usize,
    ) -> Result<Vec<String>, Interrupted<Vec<String>>> {
        let view = self.read();
        let mut matches = Vec::new();

        for candidate in view.candidates(prefix) {
            if let Some(reason) = ctx.err() {
                return Err(Interrupted::new(matches, reason));
            }
            if !candidate.starts_with(prefix) {
                continue;
            }
            matches.push(candidate.clone());
            if max > 0 && matches.len() >= max {
                break;
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancelReason;

    fn domains() -> Vec<&'static str> {
        vec!["gmail.com", "google.com", "hotmail.com", "gmx.de", "", "yahoo.com"]
    }

    #[test]
    fn test_corpus_creation() {
        let corpus = Corpus::new(domains(), false);
        assert_eq!(corpus.len(), 6);
        assert!(!corpus.is_empty());
        assert_eq!(corpus.read().bucket_count(), 0);
    }

    #[test]
    fn test_exact_membership() {
        let corpus = Corpus::new(domains(), true);
        assert!(corpus.exact("gmail.com"));
        assert!(corpus.exact(""));
        assert!(!corpus.exact("gmial.con"));
    }

    #[test]
    fn test_buckets_skip_empty_strings() {
        let corpus = Corpus::new(domains(), true);
        let view = corpus.read();

        // g, h, y
        assert_eq!(view.bucket_count(), 3);
        assert_eq!(view.candidates("gmial"), ["gmail.com", "google.com", "gmx.de"]);
        assert_eq!(view.candidates("yhaoo"), ["yahoo.com"]);
    }

    #[test]
    fn test_candidates_fall_back_to_full_list() {
        let corpus = Corpus::new(domains(), true);
        let view = corpus.read();
        assert_eq!(view.candidates("outlook.com").len(), 6);
        assert_eq!(view.candidates("").len(), 6);

        let unbucketed = Corpus::new(domains(), false);
        assert_eq!(unbucketed.read().candidates("gmial").len(), 6);
    }

    #[test]
    fn test_refresh_replaces_everything() {
        let corpus = Corpus::new(domains(), true);
        corpus.refresh(["outlook.com", "orange.fr"]);

        assert!(!corpus.exact("gmail.com"));
        assert!(corpus.exact("outlook.com"));

        let view = corpus.read();
        assert_eq!(view.list(), ["outlook.com", "orange.fr"]);
        assert_eq!(view.bucket_count(), 1);
        assert_eq!(view.candidates("gmial").len(), 2);
    }

    #[test]
    fn test_matching_prefix() {
        let corpus = Corpus::new(domains(), false);
        let ctx = Context::background();

        let all = corpus.get_matching_prefix(&ctx, "g", 0).unwrap();
        assert_eq!(all, ["gmail.com", "google.com", "gmx.de"]);

        let limited = corpus.get_matching_prefix(&ctx, "g", 2).unwrap();
        assert_eq!(limited, ["gmail.com", "google.com"]);

        let none = corpus.get_matching_prefix(&ctx, "x", 0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_matching_prefix_cancelled() {
        let corpus = Corpus::new(domains(), true);
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        let err = corpus.get_matching_prefix(&ctx, "g", 0).unwrap_err();
        assert!(err.partial.is_empty());
        assert_eq!(err.reason, CancelReason::Cancelled.into());
    }
}
