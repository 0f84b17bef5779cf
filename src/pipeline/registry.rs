// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Duplicate job name tracking

use std::collections::HashMap;

use super::job::Job;

/// Remembers every job added to a [`super::Config`]
///
/// Adding the same job twice is fine; adding a *different* job under a name
/// already taken logs a warning, since only one definition can win in the
/// provider's job table.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    jobs: HashMap<String, Job>,
    duplicates: Vec<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `job`, returning `false` if another definition holds its name
    pub fn register(&mut self, job: &Job) -> bool {
        match self.jobs.get(job.name()) {
            None => {
                self.jobs.insert(job.name().to_string(), job.clone());
                true
            }
            Some(existing) if existing == job => true,
            Some(_) => {
                if !self.duplicates.iter().any(|name| name == job.name()) {
                    tracing::warn!("Duplicate job name: `{}`", job.name());
                    self.duplicates.push(job.name().to_string());
                }
                false
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.jobs.contains_key(name)
    }

    /// Names that were reused by a different job, in discovery order
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_job_twice_is_not_a_duplicate() {
        let mut registry = NameRegistry::new();
        let job = Job::new("build").checkout();

        assert!(registry.register(&job));
        assert!(registry.register(&job.clone()));
        assert!(registry.duplicates().is_empty());
        assert!(registry.contains("build"));
    }

    #[test]
    fn test_different_job_same_name() {
        let mut registry = NameRegistry::new();
        registry.register(&Job::new("build").checkout());

        assert!(!registry.register(&Job::new("build").run("make")));
        assert!(!registry.register(&Job::new("build").run("make all")));
        assert_eq!(registry.duplicates(), ["build".to_string()]);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first = NameRegistry::new();
        let second = NameRegistry::new();
        first.register(&Job::new("lint"));

        assert!(first.contains("lint"));
        assert!(!second.contains("lint"));
    }
}
