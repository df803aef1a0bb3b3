// Typo-Suggest Service
// Matcher plus keyboard tie-break, one per reference list

use std::collections::BTreeMap;

use tracing::debug;

use crate::algorithm::{self, Algorithm, SharedAlgorithm};
use crate::config::Config;
use crate::context::Context;
use crate::keyboard::{KeyDist, LayoutRegistry, DEFAULT_LAYOUT};
use crate::matcher::{Matcher, MatcherBuilder};
use crate::processor::{MarkingTypoProcessor, Processor};
use crate::types::{FinderError, Interrupted, MatchOutcome, Suggestion};

/// Length tolerance used unless configured otherwise
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.2;

/// Suggests one reference per input for a single reference list
///
/// Combines:
/// - Input processors (erase markings and the like)
/// - The matcher's scored scan
/// - The keyboard-distance pass, only when the scan ends in a tie
pub struct Service {
    matcher: Matcher,
    keyboard: KeyDist,
    processors: Vec<Box<dyn Processor>>,
}

/// Options for [`Service`]
///
/// Starts from adaptive Jaro-Winkler, a 0.2 length tolerance and the
/// default keyboard layout.
pub struct ServiceBuilder {
    matcher: MatcherBuilder,
    registry: LayoutRegistry,
    layout: String,
    processors: Vec<Box<dyn Processor>>,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self {
            matcher: Matcher::builder()
                .with_algorithm(algorithm::adaptive_jaro_winkler())
                .with_length_tolerance(DEFAULT_LENGTH_TOLERANCE),
            registry: LayoutRegistry::with_defaults(),
            layout: DEFAULT_LAYOUT.to_string(),
            processors: Vec::new(),
        }
    }
}

impl ServiceBuilder {
    pub fn with_algorithm(mut self, alg: impl Algorithm + 'static) -> Self {
        self.matcher = self.matcher.with_algorithm(alg);
        self
    }

    pub fn with_shared_algorithm(mut self, alg: SharedAlgorithm) -> Self {
        self.matcher = self.matcher.with_shared_algorithm(alg);
        self
    }

    pub fn with_length_tolerance(mut self, tolerance: f64) -> Self {
        self.matcher = self.matcher.with_length_tolerance(tolerance);
        self
    }

    pub fn with_prefix_buckets(mut self, enabled: bool) -> Self {
        self.matcher = self.matcher.with_prefix_buckets(enabled);
        self
    }

    /// Layouts to pick the tie-break layout from
    pub fn with_registry(mut self, registry: LayoutRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Keyboard layout for the tie-break, looked up in the registry
    pub fn with_layout(mut self, name: impl Into<String>) -> Self {
        self.layout = name.into();
        self
    }

    /// Run `processor` on every input, in registration order
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn build<I, S>(self, references: I) -> Result<Service, FinderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keyboard = KeyDist::new(&self.registry, &self.layout)?;
        let matcher = self.matcher.build(references)?;
        Ok(Service {
            matcher,
            keyboard,
            processors: self.processors,
        })
    }
}

impl Service {
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Service over `references` with the default options
    pub fn new<I, S>(references: I) -> Result<Self, FinderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::builder().build(references)
    }

    /// Nearest reference for `input`
    ///
    /// A single best candidate is returned as is; several equally scored
    /// candidates are narrowed down by keyboard distance. The score is the
    /// matcher's score either way.
    pub fn find(&self, ctx: &Context, input: &str) -> Result<Suggestion, Interrupted<Suggestion>> {
        let input = self.preprocess(input);
        let outcome = self
            .matcher
            .find_top_ranking_ctx(ctx, &input)
            .map_err(|e| e.map(MatchOutcome::into_suggestion))?;

        if !outcome.is_tie() {
            return Ok(outcome.into_suggestion());
        }

        let Some((nearest, distance)) = self.keyboard.find_nearest(&input, &outcome.tie_set) else {
            return Ok(outcome.into_suggestion());
        };

        debug!(
            input = %input,
            first_pass = ?outcome.tie_set,
            suggestion = nearest,
            distance,
            "multiple suggestions, narrowed down by keyboard distance"
        );

        Ok(Suggestion::new(nearest, outcome.score).with_exact(outcome.exact))
    }

    /// Replace the reference list
    pub fn refresh<I, S>(&self, references: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matcher.refresh(references);
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    fn preprocess(&self, input: &str) -> String {
        self.processors
            .iter()
            .fold(input.to_string(), |text, p| p.process(&text))
    }
}

/// Services keyed by reference list label
#[derive(Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, Service>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One service per `[references]` entry of `config`
    pub fn from_config(config: &Config) -> Result<Self, FinderError> {
        let algorithm = algorithm::by_name(&config.finder.algorithm)?;
        let layouts = config.layout_registry();

        let mut registry = Self::new();
        for (label, references) in &config.references {
            let mut builder = Service::builder()
                .with_shared_algorithm(algorithm.clone())
                .with_length_tolerance(config.finder.length_tolerance)
                .with_prefix_buckets(config.finder.prefix_buckets)
                .with_registry(layouts.clone())
                .with_layout(config.keyboard.layout.as_str());
            if config.finder.marking_typos {
                builder = builder.with_processor(MarkingTypoProcessor);
            }
            registry.register(label.as_str(), builder.build(references.iter().cloned())?);
            debug!(label = %label, references = references.len(), "registered service");
        }
        Ok(registry)
    }

    pub fn register(&mut self, label: impl Into<String>, service: Service) {
        self.services.insert(label.into(), service);
    }

    pub fn get(&self, label: &str) -> Option<&Service> {
        self.services.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.services.contains_key(label)
    }

    /// Registered labels, sorted
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
