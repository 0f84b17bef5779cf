// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Job builder
//!
//! A [`Job`] is an immutable value: every builder method returns a new job
//! and leaves the receiver untouched, so two chains started from the same
//! base never see each other's steps.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Once};

use super::cache_keys::progressive_keys;
use super::filter::Filter;
use super::step::{
    AddSshKeys, AttachWorkspace, CacheKeys, Checkout, PersistToWorkspace, RestoreCache,
    RunCommand, SaveCache, SetupRemoteDocker, Step, StoreArtifacts, StoreTestResults,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::executors::Executor;

static PROGRESSIVE_CACHE_NOTICE: Once = Once::new();

/// Compute and memory profile of the job's primary container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceClass {
    Small,
    Medium,
    #[serde(rename = "medium+")]
    MediumPlus,
    Large,
    Xlarge,
}

/// How a workflow treats a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    /// Manual approval gate; no steps are executed
    Approval,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approval => "approval",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
struct JobState {
    #[serde(skip_serializing_if = "Option::is_none")]
    shell: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    working_directory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    parallelism: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    resource_class: Option<ResourceClass>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    environment: BTreeMap<String, String>,
}

/// A named pipeline job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    name: String,
    state: JobState,
    steps: Vec<Step>,
    executor: Option<Arc<Executor>>,
    filter: Option<Filter>,
    job_type: Option<JobType>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: JobState::default(),
            steps: Vec::new(),
            executor: None,
            filter: None,
            job_type: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn assigned_executor(&self) -> Option<&Executor> {
        self.executor.as_deref()
    }

    pub fn declared_type(&self) -> Option<JobType> {
        self.job_type
    }

    fn with(&self, update: impl FnOnce(&mut Self)) -> Self {
        let mut item = self.clone();
        update(&mut item);
        item
    }

    fn push_step(&self, step: Step) -> Self {
        self.with(|job| job.steps.push(step))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Job settings
    // ─────────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn shell(&self, shell: impl Into<String>) -> Self {
        let shell = shell.into();
        self.with(|job| job.state.shell = Some(shell))
    }

    #[must_use]
    pub fn working_directory(&self, directory: impl Into<String>) -> Self {
        let directory = directory.into();
        self.with(|job| job.state.working_directory = Some(directory))
    }

    #[must_use]
    pub fn parallelism(&self, parallelism: u32) -> Self {
        self.with(|job| job.state.parallelism = Some(parallelism))
    }

    #[must_use]
    pub fn resource_class(&self, resource_class: ResourceClass) -> Self {
        self.with(|job| job.state.resource_class = Some(resource_class))
    }

    #[must_use]
    pub fn executor(&self, executor: impl Into<Executor>) -> Self {
        let executor = Arc::new(executor.into());
        self.with(|job| job.executor = Some(executor))
    }

    /// Use an executor shared with other jobs without copying it
    #[must_use]
    pub fn shared_executor(&self, executor: &Arc<Executor>) -> Self {
        self.with(|job| job.executor = Some(Arc::clone(executor)))
    }

    /// Restrict the branches and tags the job runs for
    #[must_use]
    pub fn filter(&self, filter: &Filter) -> Self {
        self.with(|job| job.filter = Some(filter.clone()))
    }

    /// Mark how workflows should treat this job, e.g. as an approval gate
    #[must_use]
    pub fn job_type(&self, job_type: JobType) -> Self {
        self.with(|job| job.job_type = Some(job_type))
    }

    /// Set one environment variable, replacing an earlier value for `key`
    #[must_use]
    pub fn env(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        self.with(|job| {
            job.state.environment.insert(key, value);
        })
    }

    /// Merge variables into the environment; later values win on collision
    #[must_use]
    pub fn environment<I, K, V>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with(|job| job.state.environment.extend(entries))
    }

    /// Merge `KEY=VALUE` assignments into the environment
    ///
    /// Fails with [`ConfigError::InvalidArgument`] when an entry has no `=`
    /// or an empty key.
    pub fn env_assignments<I, S>(&self, assignments: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            match assignment.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    entries.push((key.to_string(), value.to_string()));
                }
                _ => {
                    return Err(ConfigError::invalid_argument_with_help(
                        format!("Environment entry '{}' has no value", assignment),
                        "If you provide an environment key, you must provide a string value (KEY=VALUE)",
                    ))
                }
            }
        }
        Ok(self.environment(entries))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Steps
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a shell command, bare or configured through [`super::RunConfig`]
    #[must_use]
    pub fn run(&self, command: impl Into<RunCommand>) -> Self {
        self.push_step(Step::Run(command.into()))
    }

    /// Check out the source into the working directory
    #[must_use]
    pub fn checkout(&self) -> Self {
        self.push_step(Step::Checkout(Checkout::default()))
    }

    /// Check out the source into `path`
    #[must_use]
    pub fn checkout_at(&self, path: impl Into<String>) -> Self {
        self.push_step(Step::Checkout(Checkout {
            path: Some(path.into()),
        }))
    }

    /// Provision a remote Docker engine for container builds
    #[must_use]
    pub fn setup_remote_docker(&self, docker_layer_caching: bool) -> Self {
        self.push_step(Step::SetupRemoteDocker(SetupRemoteDocker {
            docker_layer_caching,
        }))
    }

    #[must_use]
    pub fn save_cache<I, S>(&self, key: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.save_cache_with(SaveCache::new(key, paths))
    }

    #[must_use]
    pub fn save_cache_with(&self, cache: SaveCache) -> Self {
        self.push_step(Step::SaveCache(cache))
    }

    /// Restore from one key, or from a list tried in order
    #[must_use]
    pub fn restore_cache(&self, keys: impl Into<CacheKeys>) -> Self {
        self.restore_cache_named(keys, "Restoring Cache")
    }

    #[must_use]
    pub fn restore_cache_named(&self, keys: impl Into<CacheKeys>, name: impl Into<String>) -> Self {
        self.push_step(Step::RestoreCache(RestoreCache {
            keys: keys.into(),
            name: name.into(),
        }))
    }

    /// Restore from `key`, falling back to progressively shorter prefixes
    ///
    /// See [`progressive_keys`] for how the fallback chain is built. Fails
    /// with [`ConfigError::InvalidArgument`] when `base` is not a prefix of
    /// `key`.
    pub fn progressive_restore_cache(&self, key: &str, base: Option<&str>) -> ConfigResult<Self> {
        PROGRESSIVE_CACHE_NOTICE.call_once(|| {
            tracing::warn!("`progressive_restore_cache` is experimental and may change");
        });

        let keys = progressive_keys(key, base)?;
        Ok(self.restore_cache(keys))
    }

    #[must_use]
    pub fn deploy(&self, command: impl Into<RunCommand>) -> Self {
        self.push_step(Step::Deploy(command.into()))
    }

    #[must_use]
    pub fn store_artifacts(&self, path: impl Into<String>, destination: Option<&str>) -> Self {
        self.push_step(Step::StoreArtifacts(StoreArtifacts {
            path: path.into(),
            destination: destination.map(str::to_string),
        }))
    }

    #[must_use]
    pub fn store_test_results(&self, path: impl Into<String>) -> Self {
        self.push_step(Step::StoreTestResults(StoreTestResults { path: path.into() }))
    }

    #[must_use]
    pub fn persist_to_workspace<I, S>(&self, root: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_step(Step::PersistToWorkspace(PersistToWorkspace {
            root: root.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }))
    }

    #[must_use]
    pub fn attach_workspace(&self, at: impl Into<String>) -> Self {
        self.push_step(Step::AttachWorkspace(AttachWorkspace { at: at.into() }))
    }

    /// Add SSH keys; an empty list adds every key configured for the project
    #[must_use]
    pub fn add_ssh_keys<I, S>(&self, fingerprints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_step(Step::AddSshKeys(AddSshKeys {
            fingerprints: fingerprints.into_iter().map(Into::into).collect(),
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Composition
    // ─────────────────────────────────────────────────────────────────────────

    /// Produce `{name: body}` for the document's `jobs` list
    ///
    /// The body merges, in order, the job settings, the executor fragment,
    /// the filter fragment and finally `steps`.
    pub fn compose(&self) -> ConfigResult<Mapping> {
        let executor = self
            .executor
            .as_ref()
            .ok_or_else(|| ConfigError::MissingExecutor {
                job: self.name.clone(),
            })?;

        tracing::debug!(job = %self.name, steps = self.steps.len(), "Composing job");

        let mut body = match serde_yaml::to_value(&self.state)? {
            Value::Mapping(state) => state,
            _ => Mapping::new(),
        };
        body.extend(executor.compose()?);
        if let Some(filter) = &self.filter {
            body.extend(filter.compose());
        }
        body.insert(Value::from("steps"), serde_yaml::to_value(&self.steps)?);

        let mut fragment = Mapping::new();
        fragment.insert(Value::from(self.name.as_str()), Value::Mapping(body));
        Ok(fragment)
    }
}
