//! Prefix-aware model binding.
//!
//! Editor hooks bind and report errors with keys relative to their own
//! template (`"Required"`, `"SelectFieldSettings"`). The form they came
//! from nests those templates under the type, part, and field being
//! edited, so every key is rewritten to the full path before it reaches
//! the raw updater. The path is an immutable [`Prefix`] value; nested
//! calls derive a new updater instead of mutating a shared one, so a
//! sibling part or field never sees another's prefix.

use contentdef_core::settings::Settings;
use contentdef_core::updater::{UpdateModel, ValidationError};
use std::cell::RefCell;

/// A dotted form path, composed one nesting level at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix {
    segments: Vec<String>,
}

impl Prefix {
    /// The empty prefix: keys pass through unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// A prefix made of the given segments. Empty segments are ignored.
    pub fn nested<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// This prefix with one more segment appended.
    pub fn then(&self, segment: impl Into<String>) -> Self {
        let mut next = self.clone();
        let segment = segment.into();
        if !segment.is_empty() {
            next.segments.push(segment);
        }
        next
    }

    /// `"{segments}.{suffix}"`. An empty suffix yields the segments alone.
    pub fn apply(&self, suffix: &str) -> String {
        let mut parts: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        if !suffix.is_empty() {
            parts.push(suffix);
        }
        parts.join(".")
    }
}

/// Validation errors recorded during one service call, in order.
#[derive(Debug, Default)]
pub struct ErrorJournal {
    errors: RefCell<Vec<ValidationError>>,
}

impl ErrorJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, error: ValidationError) {
        self.errors.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Errors recorded after the journal had `mark` entries.
    pub fn since(&self, mark: usize) -> Vec<ValidationError> {
        self.errors.borrow().iter().skip(mark).cloned().collect()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors.into_inner()
    }
}

/// Wraps a raw updater, rewriting every key through a [`Prefix`] and
/// journalling every error it forwards.
pub struct PrefixedUpdater<'a> {
    inner: &'a dyn UpdateModel,
    journal: &'a ErrorJournal,
    prefix: Prefix,
}

impl<'a> PrefixedUpdater<'a> {
    /// A root updater with the identity prefix.
    pub fn new(inner: &'a dyn UpdateModel, journal: &'a ErrorJournal) -> Self {
        Self {
            inner,
            journal,
            prefix: Prefix::identity(),
        }
    }

    /// An updater over the same raw updater and journal, bound to `prefix`.
    pub fn with_prefix(&self, prefix: Prefix) -> PrefixedUpdater<'a> {
        PrefixedUpdater {
            inner: self.inner,
            journal: self.journal,
            prefix,
        }
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }
}

impl UpdateModel for PrefixedUpdater<'_> {
    fn try_update_model(&self, model: &mut Settings, prefix: &str, include: &[&str], exclude: &[&str]) -> bool {
        self.inner.try_update_model(model, &self.prefix.apply(prefix), include, exclude)
    }

    fn add_model_error(&self, key: &str, message: &str) {
        let key = self.prefix.apply(key);
        self.journal.record(ValidationError::new(key.clone(), message));
        self.inner.add_model_error(&key, message);
    }
}

/// A raw updater over posted form values (`full.dotted.key → value`).
///
/// Binding copies every value posted under the prefix into the model and
/// succeeds only when at least one value was bound, so a hook whose
/// section was not posted leaves its settings untouched.
#[derive(Debug, Default)]
pub struct FormUpdater {
    values: Settings,
    errors: RefCell<Vec<ValidationError>>,
}

impl FormUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.set(key, value);
        self
    }

    pub fn values(&self) -> &Settings {
        &self.values
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.errors.borrow().clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.borrow().is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormUpdater {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            errors: RefCell::new(Vec::new()),
        }
    }
}

impl UpdateModel for FormUpdater {
    fn try_update_model(&self, model: &mut Settings, prefix: &str, include: &[&str], exclude: &[&str]) -> bool {
        let posted = if prefix.is_empty() {
            self.values.clone()
        } else {
            self.values.scoped(prefix)
        };

        let mut bound = false;
        for (key, value) in posted.iter() {
            if !include.is_empty() && !include.contains(&key) {
                continue;
            }
            if exclude.contains(&key) {
                continue;
            }
            model.set(key, value);
            bound = true;
        }
        bound
    }

    fn add_model_error(&self, key: &str, message: &str) {
        self.errors.borrow_mut().push(ValidationError::new(key, message));
    }
}
