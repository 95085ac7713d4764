//! Opaque filter and patch types for document queries
//!
//! The engine never assumes a backend query language. Everything it needs is
//! expressed through these types: field equality, `<` / `>` comparison, and
//! field-set updates. Backends translate them into their native query form;
//! the in-memory backend evaluates them directly.

use deferq_core::Json;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A stored document: a flat map of named JSON fields
pub type Document = serde_json::Map<String, Json>;

/// A single field predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    /// Field equals the value
    Eq(Json),
    /// Field is strictly less than the value
    Lt(Json),
    /// Field is strictly greater than the value
    Gt(Json),
}

/// Conjunction of field predicates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filter {
    conditions: Vec<(String, Comparison)>,
}

impl Filter {
    /// Create an empty filter that matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a field to equal a value
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Json>) -> Self {
        self.conditions.push((field.into(), Comparison::Eq(value.into())));
        self
    }

    /// Require a field to be strictly less than a value
    pub fn lt(mut self, field: impl Into<String>, value: impl Into<Json>) -> Self {
        self.conditions.push((field.into(), Comparison::Lt(value.into())));
        self
    }

    /// Require a field to be strictly greater than a value
    pub fn gt(mut self, field: impl Into<String>, value: impl Into<Json>) -> Self {
        self.conditions.push((field.into(), Comparison::Gt(value.into())));
        self
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, comparison)| {
            let Some(value) = document.get(field) else {
                return false;
            };
            match comparison {
                Comparison::Eq(expected) => value == expected,
                Comparison::Lt(bound) => {
                    compare_values(value, bound) == Some(Ordering::Less)
                }
                Comparison::Gt(bound) => {
                    compare_values(value, bound) == Some(Ordering::Greater)
                }
            }
        })
    }
}

/// Field-set patch applied to a matched document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Update {
    set: Vec<(String, Json)>,
}

impl Update {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a value
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Json>) -> Self {
        self.set.push((field.into(), value.into()));
        self
    }

    /// Apply the patch to a document in place
    pub fn apply(&self, document: &mut Document) {
        for (field, value) in &self.set {
            document.insert(field.clone(), value.clone());
        }
    }
}

/// Sort direction for `find_many`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Options for `find_many`: optional single-field sort and result limit
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl FindOptions {
    /// Create empty options (no sort, no limit)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort results by a field
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Limit the number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Order two JSON values for comparison predicates and sorting.
///
/// Numbers compare numerically, strings lexicographically. Mixed or
/// non-orderable types yield `None` and never match a range predicate.
pub fn compare_values(a: &Json, b: &Json) -> Option<Ordering> {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => {
            x.as_f64().partial_cmp(&y.as_f64())
        }
        (Json::String(x), Json::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
