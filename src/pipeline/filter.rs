// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Branch and tag filters
//!
//! A [`Filter`] decides whether a job or a scheduled trigger applies to a
//! given branch or tag. Every operation returns a new filter.

use serde_yaml::{Mapping, Value};

/// Replacement lists for one filter axis (branches or tags)
///
/// `None` leaves the corresponding list untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patterns {
    /// Names the filter is restricted to
    pub only: Option<Vec<String>>,
    /// Names the filter excludes
    pub ignore: Option<Vec<String>>,
}

impl Patterns {
    /// Replace the `only` list
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: Some(names.into_iter().map(Into::into).collect()),
            ignore: None,
        }
    }

    /// Replace the `ignore` list
    pub fn ignore<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only: None,
            ignore: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Also replace the `ignore` list
    pub fn and_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

/// Inclusion/exclusion rules over branch and tag names
#[derive(Debug, Clone, Default)]
pub struct Filter {
    only_branches: Vec<String>,
    ignore_branches: Vec<String>,
    only_tags: Vec<String>,
    ignore_tags: Vec<String>,
    warned: bool,
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.only_branches == other.only_branches
            && self.ignore_branches == other.ignore_branches
            && self.only_tags == other.only_tags
            && self.ignore_tags == other.ignore_tags
    }
}

impl Eq for Filter {}

impl Filter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given branches, appending to any existing list
    #[must_use]
    pub fn only<I, S>(&self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut item = self.clone();
        if !item.ignore_branches.is_empty() {
            item.warn_contradiction();
        }
        item.only_branches
            .extend(branches.into_iter().map(Into::into));
        item
    }

    /// Exclude the given branches, appending to any existing list
    #[must_use]
    pub fn ignore<I, S>(&self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut item = self.clone();
        if !item.only_branches.is_empty() {
            item.warn_contradiction();
        }
        item.ignore_branches
            .extend(branches.into_iter().map(Into::into));
        item
    }

    /// Replace the branch lists named in `patterns`
    #[must_use]
    pub fn branches(&self, patterns: Patterns) -> Self {
        let mut item = self.clone();
        if let Some(ignore) = patterns.ignore {
            item.ignore_branches = ignore;
        }
        if let Some(only) = patterns.only {
            item.only_branches = only;
        }
        item
    }

    /// Replace the tag lists named in `patterns`
    #[must_use]
    pub fn tags(&self, patterns: Patterns) -> Self {
        let mut item = self.clone();
        if let Some(ignore) = patterns.ignore {
            item.ignore_tags = ignore;
        }
        if let Some(only) = patterns.only {
            item.only_tags = only;
        }
        item
    }

    /// Whether the filter has no rules on either axis
    pub fn is_empty(&self) -> bool {
        self.only_branches.is_empty()
            && self.ignore_branches.is_empty()
            && self.only_tags.is_empty()
            && self.ignore_tags.is_empty()
    }

    /// Produce the `branches` / `tags` fragment
    pub fn compose(&self) -> Mapping {
        let mut fragment = Mapping::new();
        if let Some(branches) = compose_axis(&self.only_branches, &self.ignore_branches) {
            fragment.insert(Value::from("branches"), branches);
        }
        if let Some(tags) = compose_axis(&self.only_tags, &self.ignore_tags) {
            fragment.insert(Value::from("tags"), tags);
        }
        fragment
    }

    fn warn_contradiction(&mut self) {
        if self.warned {
            return;
        }
        tracing::warn!(
            "Adding `ignore` branches will result in `only` branches being ignored"
        );
        self.warned = true;
    }
}

fn compose_axis(only: &[String], ignore: &[String]) -> Option<Value> {
    if only.is_empty() && ignore.is_empty() {
        return None;
    }

    let mut axis = Mapping::new();
    if !only.is_empty() {
        axis.insert(Value::from("only"), Value::from(only.to_vec()));
    }
    if !ignore.is_empty() {
        axis.insert(Value::from("ignore"), Value::from(ignore.to_vec()));
    }
    Some(Value::Mapping(axis))
}
