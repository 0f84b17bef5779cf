// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Root pipeline configuration
//!
//! [`Config`] gathers workflows and composes the final document:
//!
//! ```yaml
//! version: '2'
//! workflows:
//!   version: '2'
//!   build-and-test: { jobs: [...] }
//! jobs:
//!   - build: { docker: [...], steps: [...] }
//! ```

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use super::registry::NameRegistry;
use super::workflow::Workflow;
use crate::errors::ConfigResult;
use crate::output::{DocumentFormat, FileWriter, OutputWriter, YamlFormat};

/// Where the document is written unless overridden
pub const DEFAULT_OUTPUT_LOCATION: &str = ".circleci/config.yml";

/// Document schema version emitted at both the root and `workflows`
pub const SCHEMA_VERSION: &str = "2";

/// A complete pipeline: workflows plus the jobs they reference
#[derive(Debug, Clone)]
pub struct Config {
    workflows: Vec<Workflow>,
    output_location: PathBuf,
    registry: NameRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_registry(NameRegistry::new())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing duplicate-name registry
    pub fn with_registry(registry: NameRegistry) -> Self {
        Self {
            workflows: Vec::new(),
            output_location: PathBuf::from(DEFAULT_OUTPUT_LOCATION),
            registry,
        }
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    pub fn location(&self) -> &Path {
        &self.output_location
    }

    #[must_use]
    pub fn workflow(&self, workflow: &Workflow) -> Self {
        let mut item = self.clone();
        for job in workflow.jobs() {
            item.registry.register(job);
        }
        item.workflows.push(workflow.clone());
        item
    }

    #[must_use]
    pub fn output_location(&self, path: impl Into<PathBuf>) -> Self {
        Self {
            output_location: path.into(),
            ..self.clone()
        }
    }

    /// Output location, resolved against the current directory when relative
    pub fn resolved_location(&self) -> ConfigResult<PathBuf> {
        if self.output_location.is_absolute() {
            Ok(self.output_location.clone())
        } else {
            Ok(std::env::current_dir()?.join(&self.output_location))
        }
    }

    /// Compose the full document
    ///
    /// Fails if any referenced job cannot be composed, e.g. because it has
    /// no executor.
    pub fn compose(&self) -> ConfigResult<Value> {
        let mut workflows = Mapping::new();
        workflows.insert(Value::from("version"), Value::from(SCHEMA_VERSION));
        for workflow in &self.workflows {
            workflows.extend(workflow.compose());
        }

        let mut jobs = Vec::new();
        for job in self.workflows.iter().flat_map(Workflow::jobs) {
            jobs.push(Value::Mapping(job.compose()?));
        }

        tracing::debug!(
            workflows = self.workflows.len(),
            jobs = jobs.len(),
            "Composed pipeline"
        );

        let mut document = Mapping::new();
        document.insert(Value::from("version"), Value::from(SCHEMA_VERSION));
        document.insert(Value::from("workflows"), Value::Mapping(workflows));
        document.insert(Value::from("jobs"), Value::Sequence(jobs));
        Ok(Value::Mapping(document))
    }

    /// Compose and serialize with `format`
    pub fn to_string_with(&self, format: &dyn DocumentFormat) -> ConfigResult<String> {
        format.serialize(&self.compose()?)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        self.to_string_with(&YamlFormat)
    }

    /// Write YAML to the output location, blocking until done
    pub fn write_sync(&self) -> ConfigResult<PathBuf> {
        self.write_sync_with(&FileWriter::new())
    }

    pub fn write_sync_with(&self, writer: &dyn OutputWriter) -> ConfigResult<PathBuf> {
        let path = self.resolved_location()?;
        let contents = self.to_yaml()?;
        writer.write_sync(&path, &contents)?;
        Ok(path)
    }

    /// Write YAML to the output location
    pub async fn write(&self) -> ConfigResult<PathBuf> {
        self.write_with(&FileWriter::new()).await
    }

    pub async fn write_with(&self, writer: &dyn OutputWriter) -> ConfigResult<PathBuf> {
        let path = self.resolved_location()?;
        let contents = self.to_yaml()?;
        writer.write(&path, &contents).await?;
        Ok(path)
    }
}
