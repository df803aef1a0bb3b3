// Typo-Suggest Keyboard Distance
// Breaks score ties by how far apart the mistyped keys are

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::types::FinderError;

/// Name of the built-in US QWERTY layout
pub const QWERTY_US: &str = "qwerty-us";

/// Layout used when none is configured
pub const DEFAULT_LAYOUT: &str = QWERTY_US;

/// Cost of every input character past the end of the candidate
// TODO: derive from typing data once per-layout error rates are collected
const MISSING_CHAR_PENALTY: f64 = 3.0;

/// Rows of the US QWERTY layout, without shifted symbols
const QWERTY_US_ROWS: &[&str] = &[
    "`1234567890-=",
    " qwertyuiop[]\\",
    " asdfghjkl;'",
    " zxcvbnm,./",
];

/// Position of a key: column within the row, row index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    /// Euclidean distance between two keys
    pub fn distance(self, other: Coordinates) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// Key positions of one layout; immutable once built
#[derive(Debug, Clone, Default)]
pub struct KeyGrid {
    keys: FxHashMap<char, Coordinates>,
}

impl KeyGrid {
    /// Build a grid from layout rows
    ///
    /// Spaces only pad columns and are never mapped.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let mut keys = FxHashMap::default();
        for (y, row) in rows.iter().enumerate() {
            for (x, key) in row.as_ref().chars().enumerate() {
                if key == ' ' {
                    continue;
                }
                keys.insert(
                    key,
                    Coordinates {
                        x: x as i32,
                        y: y as i32,
                    },
                );
            }
        }
        Self { keys }
    }

    pub fn get(&self, key: char) -> Option<Coordinates> {
        self.keys.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Named layouts, each turned into a grid once at registration
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    grids: FxHashMap<String, Arc<KeyGrid>>,
}

impl LayoutRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in layouts
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(QWERTY_US, QWERTY_US_ROWS);
        registry
    }

    /// Add or replace a layout
    pub fn register<S: AsRef<str>>(&mut self, name: impl Into<String>, rows: &[S]) {
        self.grids
            .insert(name.into(), Arc::new(KeyGrid::from_rows(rows)));
    }

    pub fn get(&self, name: &str) -> Option<Arc<KeyGrid>> {
        self.grids.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.grids.contains_key(name)
    }

    /// Registered layout names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.grids.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Picks the candidate whose differing keys lie closest to the input's
///
/// Lower distances are better, the opposite of matcher scores.
#[derive(Debug, Clone)]
pub struct KeyDist {
    grid: Arc<KeyGrid>,
}

impl KeyDist {
    /// Use the layout `name` from `registry`
    pub fn new(registry: &LayoutRegistry, name: &str) -> Result<Self, FinderError> {
        registry
            .get(name)
            .map(Self::from_grid)
            .ok_or_else(|| FinderError::UnknownLayout(name.to_string()))
    }

    pub fn from_grid(grid: Arc<KeyGrid>) -> Self {
        Self { grid }
    }

    /// Total key distance between `input` and `candidate`, position by position
    ///
    /// Equal characters and characters missing from the grid cost nothing;
    /// input characters beyond the candidate's end cost a fixed penalty each.
    pub fn distance(&self, input: &str, candidate: &str) -> f64 {
        let input_len = input.chars().count();
        let mut candidate_chars = candidate.chars();
        let mut total = 0.0;

        for (i, left) in input.chars().enumerate() {
            let Some(right) = candidate_chars.next() else {
                total += MISSING_CHAR_PENALTY * (input_len - i) as f64;
                break;
            };
            if left == right {
                continue;
            }
            if let (Some(a), Some(b)) = (self.grid.get(left), self.grid.get(right)) {
                total += a.distance(b);
            }
        }

        total
    }

    /// Nearest candidate and its distance; the first one wins ties
    pub fn find_nearest<'a, S: AsRef<str>>(
        &self,
        input: &str,
        candidates: &'a [S],
    ) -> Option<(&'a str, f64)> {
        let mut nearest: Option<(&'a str, f64)> = None;
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let distance = self.distance(input, candidate);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((candidate, distance)),
            }
        }
        nearest
    }
}
