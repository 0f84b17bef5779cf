// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Reading composed documents back
//!
//! Loads a configuration file written by [`crate::Config`] (or by hand) so
//! it can be validated and its workflow graphs inspected.

mod dag;
mod validation;

pub use dag::WorkflowGraph;
pub use validation::{DocumentValidator, ValidationResult};

use serde_yaml::{Mapping, Value};
use std::path::Path;

use crate::errors::{ConfigError, ConfigResult};

/// Keys under which a job body declares its executor
pub const EXECUTOR_KEYS: [&str; 3] = ["docker", "machine", "macos"];

/// A parsed configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Mapping,
}

/// One job entry of a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEntry {
    pub name: String,
    pub requires: Vec<String>,
    pub job_type: Option<String>,
}

impl EdgeEntry {
    pub fn is_approval(&self) -> bool {
        self.job_type.as_deref() == Some("approval")
    }
}

/// A workflow as found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowEntry {
    pub name: String,
    pub jobs: Vec<EdgeEntry>,
    pub triggers: usize,
}

/// A job definition as found in the document
#[derive(Debug, Clone, PartialEq)]
pub struct JobEntry {
    pub name: String,
    pub body: Mapping,
}

impl JobEntry {
    /// Executor key used by the job, if any
    pub fn executor(&self) -> Option<&'static str> {
        EXECUTOR_KEYS
            .into_iter()
            .find(|key| self.body.contains_key(*key))
    }

    /// Number of steps, `None` if the job has no `steps` list
    pub fn step_count(&self) -> Option<usize> {
        self.body
            .get("steps")
            .and_then(Value::as_sequence)
            .map(Vec::len)
    }
}

impl Document {
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(ConfigError::invalid_document(
                "Top level of the document must be a mapping",
            )),
        }
    }

    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Self::from_value(serde_yaml::from_str(yaml)?)
    }

    /// Load a document from a YAML (or JSON) file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_yaml(&content)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    /// Root `version`, rendered as text whether quoted or not
    pub fn version(&self) -> Option<String> {
        scalar_text(self.root.get("version")?)
    }

    /// `workflows.version`
    pub fn workflows_version(&self) -> Option<String> {
        scalar_text(self.root.get("workflows")?.get("version")?)
    }

    /// Workflows in document order
    pub fn workflows(&self) -> ConfigResult<Vec<WorkflowEntry>> {
        let Some(workflows) = self.root.get("workflows") else {
            return Ok(Vec::new());
        };
        let workflows = workflows
            .as_mapping()
            .ok_or_else(|| ConfigError::invalid_document("`workflows` must be a mapping"))?;

        workflows
            .iter()
            .filter(|(key, _)| key.as_str() != Some("version"))
            .map(|(key, body)| parse_workflow(key, body))
            .collect()
    }

    /// Look up one workflow by name
    pub fn workflow(&self, name: &str) -> ConfigResult<WorkflowEntry> {
        self.workflows()?
            .into_iter()
            .find(|w| w.name == name)
            .ok_or_else(|| ConfigError::UnknownWorkflow {
                name: name.to_string(),
            })
    }

    /// Job definitions in document order
    ///
    /// Accepts both the list-of-single-key-mappings shape this crate emits
    /// and a plain mapping of name to body.
    pub fn jobs(&self) -> ConfigResult<Vec<JobEntry>> {
        match self.root.get("jobs") {
            None => Ok(Vec::new()),
            Some(Value::Sequence(items)) => {
                let mut jobs = Vec::new();
                for item in items {
                    let entry = item.as_mapping().ok_or_else(|| {
                        ConfigError::invalid_document("Each entry of `jobs` must be a mapping")
                    })?;
                    for (name, body) in entry {
                        jobs.push(parse_job(name, body)?);
                    }
                }
                Ok(jobs)
            }
            Some(Value::Mapping(entries)) => entries
                .iter()
                .map(|(name, body)| parse_job(name, body))
                .collect(),
            Some(_) => Err(ConfigError::invalid_document(
                "`jobs` must be a list or a mapping",
            )),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn key_text(key: &Value, what: &str) -> ConfigResult<String> {
    key.as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::invalid_document(format!("{} names must be strings", what)))
}

fn parse_workflow(key: &Value, body: &Value) -> ConfigResult<WorkflowEntry> {
    let name = key_text(key, "Workflow")?;
    let body = body.as_mapping().ok_or_else(|| {
        ConfigError::invalid_document(format!("Workflow '{}' must be a mapping", name))
    })?;

    let jobs = match body.get("jobs") {
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| parse_edge(&name, item))
            .collect::<ConfigResult<Vec<_>>>()?,
        Some(_) => {
            return Err(ConfigError::invalid_document(format!(
                "Workflow '{}': `jobs` must be a list",
                name
            )))
        }
        None => Vec::new(),
    };

    let triggers = body
        .get("triggers")
        .and_then(Value::as_sequence)
        .map_or(0, Vec::len);

    Ok(WorkflowEntry {
        name,
        jobs,
        triggers,
    })
}

fn parse_edge(workflow: &str, item: &Value) -> ConfigResult<EdgeEntry> {
    match item {
        Value::String(name) => Ok(EdgeEntry {
            name: name.clone(),
            requires: Vec::new(),
            job_type: None,
        }),
        Value::Mapping(entry) if entry.len() == 1 => {
            let (key, body) = entry.iter().next().ok_or_else(|| {
                ConfigError::invalid_document(format!("Workflow '{}': empty job entry", workflow))
            })?;
            let name = key_text(key, "Job")?;
            let requires = body
                .get("requires")
                .and_then(Value::as_sequence)
                .map(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            let job_type = body.get("type").and_then(Value::as_str).map(str::to_string);

            Ok(EdgeEntry {
                name,
                requires,
                job_type,
            })
        }
        _ => Err(ConfigError::invalid_document(format!(
            "Workflow '{}': job entries must be a name or a single-key mapping",
            workflow
        ))),
    }
}

fn parse_job(key: &Value, body: &Value) -> ConfigResult<JobEntry> {
    let name = key_text(key, "Job")?;
    let body = body
        .as_mapping()
        .cloned()
        .ok_or_else(|| ConfigError::invalid_document(format!("Job '{}' must be a mapping", name)))?;

    Ok(JobEntry { name, body })
}
