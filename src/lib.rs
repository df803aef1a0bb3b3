//! # Typo-Suggest: Nearest-Reference Suggestions for Mistyped Input
//!
//! Finds the reference string closest to a possibly misspelled input, e.g.
//! `gmail.com` for `gmial.con`, and breaks score ties by keyboard distance.
//!
//! ## Two Passes
//!
//! 1. **Scored scan** - every candidate surviving the prefix and length filters
//!    is scored by a pluggable [`Algorithm`]; all candidates sharing the best
//!    score form the tie-set
//!    - `matcher.find_top_ranking_ctx(&ctx, "gmial.con")`
//! 2. **Keyboard tie-break** - only when the tie-set holds more than one
//!    candidate, the one whose differing keys lie closest on the keyboard wins
//!    - `service.find(&ctx, "bee5")` → `beer`
//!
//! ## Example Usage
//!
//! ```
//! use typo_suggest::{algorithm, Context, Matcher, Service};
//!
//! let matcher = Matcher::builder()
//!     .with_algorithm(algorithm::jaro_winkler_defaults())
//!     .with_length_tolerance(0.2)
//!     .build(["gmail.com", "hotmail.com", "yahoo.com"])?;
//!
//! // Exact references are returned as is
//! assert!(matcher.find("gmail.com").exact);
//!
//! // Tie-aware lookup with a deadline
//! let ctx = Context::with_timeout(std::time::Duration::from_millis(50));
//! let outcome = matcher.find_top_ranking_ctx(&ctx, "gmial.con").unwrap();
//! assert_eq!(outcome.tie_set, ["gmail.com"]);
//!
//! // Service = matcher + keyboard tie-break
//! let service = Service::new(["beef", "beer"])?;
//! assert_eq!(service.find(&Context::background(), "bee5").unwrap().value, "beer");
//! # Ok::<(), typo_suggest::FinderError>(())
//! ```
//!
//! ## Architecture
//!
//! - **ConcurrentRwLock** - Reader-biased lock guarding the corpus
//! - **Corpus** - Reference list, membership set and first-character buckets
//! - **Matcher** - Cancellable scored scan collecting the tie-set
//! - **KeyDist** - Keyboard-distance tie-breaker over a layout registry
//! - **Service** - Processors, matcher and tie-breaker for one reference list

pub mod algorithm;
pub mod config;
pub mod context;
pub mod corpus;
pub mod keyboard;
pub mod matcher;
pub mod processor;
pub mod rwlock;
pub mod service;
pub mod types;

// Re-export main types and functions for convenience
pub use algorithm::{Algorithm, SharedAlgorithm};
pub use config::Config;
pub use context::{CancelHandle, CancelReason, Context};
pub use corpus::{Corpus, CorpusView};
pub use keyboard::{KeyDist, KeyGrid, LayoutRegistry};
pub use matcher::{Matcher, MatcherBuilder};
pub use processor::{MarkingTypoProcessor, Processor};
pub use rwlock::{ConcurrentRwLock, RwcLock};
pub use service::{Service, ServiceBuilder, ServiceRegistry};
pub use types::{
    FinderError, Interrupted, MatchOutcome, Suggestion, BEST_SCORE_VALUE, WORST_SCORE_VALUE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
