// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Structural validation of configuration documents
//!
//! Checks the shape the builder guarantees: versions, job bodies, workflow
//! references and acyclic `requires` graphs. Step contents are not checked.

use std::collections::{HashMap, HashSet};

use super::{Document, JobEntry, WorkflowGraph, EXECUTOR_KEYS};
use crate::errors::ConfigError;
use crate::pipeline::SCHEMA_VERSION;

/// Document validator
pub struct DocumentValidator;

impl DocumentValidator {
    /// Validate a parsed document
    pub fn validate(document: &Document) -> ValidationResult {
        let mut result = ValidationResult::new();

        match document.version() {
            Some(version) if version == SCHEMA_VERSION => {}
            Some(version) => result.add_error(&format!(
                "Unsupported version '{}', expected '{}'",
                version, SCHEMA_VERSION
            )),
            None => result.add_error("Missing top-level `version`"),
        }

        let jobs = match document.jobs() {
            Ok(jobs) => jobs,
            Err(e) => {
                result.add_error(&e.to_string());
                Vec::new()
            }
        };
        Self::validate_jobs(&jobs, &mut result);

        let workflows = match document.workflows() {
            Ok(workflows) => workflows,
            Err(e) => {
                result.add_error(&e.to_string());
                return result;
            }
        };

        if workflows.is_empty() {
            result.add_error("Document has no workflows defined");
        } else if document.workflows_version().as_deref() != Some(SCHEMA_VERSION) {
            result.add_warning(&format!(
                "`workflows.version` should be '{}'",
                SCHEMA_VERSION
            ));
        }

        let defined: HashSet<&str> = jobs.iter().map(|job| job.name.as_str()).collect();

        for workflow in &workflows {
            let listed: HashSet<&str> = workflow.jobs.iter().map(|e| e.name.as_str()).collect();

            for edge in &workflow.jobs {
                if !edge.is_approval() && !defined.contains(edge.name.as_str()) {
                    result.add_error(&format!(
                        "Workflow '{}': job '{}' is not defined in `jobs`",
                        workflow.name, edge.name
                    ));
                }

                for required in &edge.requires {
                    if !listed.contains(required.as_str()) {
                        result.add_warning(&format!(
                            "Workflow '{}': job '{}' requires '{}', which is not part of the workflow",
                            workflow.name, edge.name, required
                        ));
                    }
                }
            }

            match WorkflowGraph::build(workflow) {
                Ok(_) => {}
                Err(ConfigError::CircularDependency { jobs, .. }) => {
                    result.add_error(&format!(
                        "Workflow '{}': circular dependency between {}",
                        workflow.name,
                        jobs.join(", ")
                    ));
                }
                Err(e) => result.add_error(&e.to_string()),
            }
        }

        result
    }

    fn validate_jobs(jobs: &[JobEntry], result: &mut ValidationResult) {
        let mut seen: HashMap<&str, &JobEntry> = HashMap::new();

        for job in jobs {
            match seen.get(job.name.as_str()) {
                Some(previous) if previous.body != job.body => {
                    result.add_warning(&format!(
                        "Job '{}' is defined more than once with different bodies",
                        job.name
                    ));
                }
                Some(_) => continue,
                None => {
                    seen.insert(job.name.as_str(), job);
                }
            }

            Self::validate_job(job, result);
        }
    }

    fn validate_job(job: &JobEntry, result: &mut ValidationResult) {
        let executors: Vec<&str> = EXECUTOR_KEYS
            .into_iter()
            .filter(|key| job.body.contains_key(*key))
            .collect();

        match executors.as_slice() {
            [] => result.add_error(&format!("Job '{}': no executor declared", job.name)),
            ["docker"] => {
                let images = job.body.get("docker").and_then(|d| d.as_sequence());
                if images.map_or(true, |images| images.is_empty()) {
                    result.add_error(&format!(
                        "Job '{}': docker executor declares no images",
                        job.name
                    ));
                }
            }
            [_] => {}
            many => result.add_error(&format!(
                "Job '{}': more than one executor declared ({})",
                job.name,
                many.join(", ")
            )),
        }

        match job.step_count() {
            None => result.add_error(&format!("Job '{}': missing `steps` list", job.name)),
            Some(0) => result.add_warning(&format!("Job '{}': has no steps", job.name)),
            Some(_) => {}
        }
    }
}

/// Result of document validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executors::{Docker, Machine};
    use crate::pipeline::{Config, Job, JobEdge, Workflow};

    fn validate_config(config: &Config) -> ValidationResult {
        let document = Document::from_value(config.compose().unwrap()).unwrap();
        DocumentValidator::validate(&document)
    }

    #[test]
    fn test_builder_output_is_valid() {
        let build = Job::new("build")
            .executor(Docker::with_image("rust:1"))
            .checkout()
            .run("cargo build");
        let test = Job::new("test").executor(Machine::new()).run("cargo test");
        let config = Config::new().workflow(
            &Workflow::new("ci")
                .job(&build)
                .edge(JobEdge::new(&test).requires(&[&build])),
        );

        let result = validate_config(&config);
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(!result.has_warnings(), "{:?}", result.warnings);
    }

    #[test]
    fn test_approval_entry_needs_no_job_body() {
        let yaml = "version: '2'\nworkflows:\n  version: '2'\n  w:\n    jobs:\n      - hold:\n          type: approval\n";
        let result = DocumentValidator::validate(&Document::from_yaml(yaml).unwrap());
        assert!(result.is_valid(), "{:?}", result.errors);
    }

    #[test]
    fn test_dangling_requires_is_a_warning() {
        let exec = Machine::new();
        let build = Job::new("build").executor(exec.clone()).run("make");
        let deploy = Job::new("deploy").executor(exec).run("make deploy");
        let config = Config::new()
            .workflow(&Workflow::new("release").edge(JobEdge::new(&deploy).requires(&[&build])));

        let result = validate_config(&config);
        assert!(result.is_valid(), "{:?}", result.errors);
        assert!(result.warnings.iter().any(|w| w.contains("not part of the workflow")));
    }

    #[test]
    fn test_structural_errors() {
        let yaml = r#"
version: '1'
workflows:
  version: '2'
  ci:
    jobs:
      - a:
          requires: [b]
      - b:
          requires: [a]
      - ghost
jobs:
  - a:
      steps: [checkout]
  - b:
      docker: []
      machine: {}
  - b:
      docker: []
      machine: {}
      steps: []
"#;
        let result = DocumentValidator::validate(&Document::from_yaml(yaml).unwrap());

        assert!(result.errors.iter().any(|e| e.contains("Unsupported version '1'")));
        assert!(result.errors.iter().any(|e| e.contains("'a': no executor")));
        assert!(result.errors.iter().any(|e| e.contains("more than one executor")));
        assert!(result.errors.iter().any(|e| e.contains("missing `steps`")));
        assert!(result.errors.iter().any(|e| e.contains("'ghost' is not defined")));
        assert!(result.errors.iter().any(|e| e.contains("circular dependency")));
        assert!(result.warnings.iter().any(|w| w.contains("more than once")));
    }

    #[test]
    fn test_empty_document() {
        let result = DocumentValidator::validate(&Document::from_yaml("version: '2'\n").unwrap());
        assert!(!result.is_valid());
        assert!(result.errors[0].contains("no workflows"));
    }

    #[test]
    fn test_docker_without_images() {
        let yaml = "version: '2'\nworkflows:\n  version: '2'\n  w:\n    jobs: [a]\njobs:\n  - a:\n      docker: []\n      steps: [checkout]\n";
        let result = DocumentValidator::validate(&Document::from_yaml(yaml).unwrap());
        assert_eq!(result.errors, vec!["Job 'a': docker executor declares no images"]);
    }
}
