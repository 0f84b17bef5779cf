// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Job steps
//!
//! Each [`Step`] serializes as a single-key mapping (`run: ...`,
//! `save_cache: ...`) or, for steps that carry no options, as a bare
//! marker string such as `checkout`.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// When a step runs relative to the outcome of earlier steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum When {
    Always,
    #[default]
    OnSuccess,
    OnFail,
}

/// Options for a `run` or `deploy` step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    working_directory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    shell: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    when: Option<When>,

    #[serde(skip_serializing_if = "Option::is_none")]
    no_output_timeout: Option<String>,
}

impl RunConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            name: None,
            command: command.into(),
            environment: None,
            working_directory: None,
            shell: None,
            background: None,
            when: None,
            no_output_timeout: None,
        }
    }

    /// Title shown in the CI UI
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add one environment variable for this command
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn working_directory(mut self, directory: impl Into<String>) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn background(mut self, background: bool) -> Self {
        self.background = Some(background);
        self
    }

    pub fn when(mut self, when: When) -> Self {
        self.when = Some(when);
        self
    }

    /// Elapsed time without output before the command is killed, e.g. `"20m"`
    pub fn no_output_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.no_output_timeout = Some(timeout.into());
        self
    }
}

/// A shell command, either bare or with options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RunCommand {
    Command(String),
    Config(RunConfig),
}

impl From<&str> for RunCommand {
    fn from(command: &str) -> Self {
        Self::Command(command.to_string())
    }
}

impl From<String> for RunCommand {
    fn from(command: String) -> Self {
        Self::Command(command)
    }
}

impl From<RunConfig> for RunCommand {
    fn from(config: RunConfig) -> Self {
        Self::Config(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Checkout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetupRemoteDocker {
    pub docker_layer_caching: bool,
}

/// A `save_cache` step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveCache {
    paths: Vec<String>,
    key: String,
    name: String,
    when: When,
}

impl SaveCache {
    /// Cache `paths` under `key`, named "Saving Cache" and run on success
    pub fn new<I, S>(key: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            key: key.into(),
            name: "Saving Cache".to_string(),
            when: When::OnSuccess,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn when(mut self, when: When) -> Self {
        self.when = when;
        self
    }
}

/// Keys for a `restore_cache` step
///
/// A list is tried in order and the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CacheKeys {
    #[serde(rename = "key")]
    Single(String),
    #[serde(rename = "keys")]
    Multiple(Vec<String>),
}

impl CacheKeys {
    /// Keys in lookup order
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(key) => std::slice::from_ref(key),
            Self::Multiple(keys) => keys,
        }
    }
}

impl From<&str> for CacheKeys {
    fn from(key: &str) -> Self {
        Self::Single(key.to_string())
    }
}

impl From<String> for CacheKeys {
    fn from(key: String) -> Self {
        Self::Single(key)
    }
}

impl<S: Into<String>> From<Vec<S>> for CacheKeys {
    fn from(keys: Vec<S>) -> Self {
        Self::Multiple(keys.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for CacheKeys {
    fn from(keys: [S; N]) -> Self {
        Self::Multiple(keys.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreCache {
    #[serde(flatten)]
    pub keys: CacheKeys,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreArtifacts {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreTestResults {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistToWorkspace {
    pub root: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachWorkspace {
    pub at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddSshKeys {
    pub fingerprints: Vec<String>,
}

/// One action within a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Run(RunCommand),
    Checkout(Checkout),
    SetupRemoteDocker(SetupRemoteDocker),
    SaveCache(SaveCache),
    RestoreCache(RestoreCache),
    Deploy(RunCommand),
    StoreArtifacts(StoreArtifacts),
    StoreTestResults(StoreTestResults),
    PersistToWorkspace(PersistToWorkspace),
    AttachWorkspace(AttachWorkspace),
    AddSshKeys(AddSshKeys),
}

impl Step {
    /// Step name as it appears in the document
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Run(_) => "run",
            Self::Checkout(_) => "checkout",
            Self::SetupRemoteDocker(_) => "setup_remote_docker",
            Self::SaveCache(_) => "save_cache",
            Self::RestoreCache(_) => "restore_cache",
            Self::Deploy(_) => "deploy",
            Self::StoreArtifacts(_) => "store_artifacts",
            Self::StoreTestResults(_) => "store_test_results",
            Self::PersistToWorkspace(_) => "persist_to_workspace",
            Self::AttachWorkspace(_) => "attach_workspace",
            Self::AddSshKeys(_) => "add_ssh_keys",
        }
    }

    fn is_bare(&self) -> bool {
        match self {
            Self::Checkout(checkout) => checkout.path.is_none(),
            Self::AddSshKeys(keys) => keys.fingerprints.is_empty(),
            _ => false,
        }
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.kind();
        if self.is_bare() {
            return serializer.serialize_str(kind);
        }

        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Run(command) | Self::Deploy(command) => map.serialize_entry(kind, command)?,
            Self::Checkout(checkout) => map.serialize_entry(kind, checkout)?,
            Self::SetupRemoteDocker(setup) => map.serialize_entry(kind, setup)?,
            Self::SaveCache(cache) => map.serialize_entry(kind, cache)?,
            Self::RestoreCache(cache) => map.serialize_entry(kind, cache)?,
            Self::StoreArtifacts(artifacts) => map.serialize_entry(kind, artifacts)?,
            Self::StoreTestResults(results) => map.serialize_entry(kind, results)?,
            Self::PersistToWorkspace(persist) => map.serialize_entry(kind, persist)?,
            Self::AttachWorkspace(attach) => map.serialize_entry(kind, attach)?,
            Self::AddSshKeys(keys) => map.serialize_entry(kind, keys)?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn to_value(step: Step) -> Value {
        serde_yaml::to_value(step).unwrap()
    }

    #[test]
    fn test_bare_run() {
        let value = to_value(Step::Run("echo hi".into()));
        assert_eq!(value["run"], Value::from("echo hi"));
    }

    #[test]
    fn test_run_config_uses_underscored_names_and_omits_unset() {
        let config = RunConfig::new("make test")
            .working_directory("~/project")
            .no_output_timeout("20m");
        let value = to_value(Step::Run(config.into()));
        let run = value["run"].as_mapping().unwrap();

        assert_eq!(run.len(), 3);
        assert_eq!(run["command"], Value::from("make test"));
        assert_eq!(run["working_directory"], Value::from("~/project"));
        assert_eq!(run["no_output_timeout"], Value::from("20m"));
    }

    #[test]
    fn test_when_serializes_snake_case() {
        let config = RunConfig::new("notify").when(When::OnFail).background(true);
        let value = to_value(Step::Run(config.into()));
        assert_eq!(value["run"]["when"], Value::from("on_fail"));
        assert_eq!(value["run"]["background"], Value::from(true));
    }

    #[test]
    fn test_checkout_marker_and_path() {
        assert_eq!(to_value(Step::Checkout(Checkout::default())), Value::from("checkout"));

        let value = to_value(Step::Checkout(Checkout {
            path: Some("~/src".into()),
        }));
        assert_eq!(value["checkout"]["path"], Value::from("~/src"));
    }

    #[test]
    fn test_save_cache_defaults() {
        let value = to_value(Step::SaveCache(SaveCache::new("v1-deps", ["node_modules"])));
        let cache = &value["save_cache"];
        assert_eq!(cache["key"], Value::from("v1-deps"));
        assert_eq!(cache["paths"], Value::from(vec!["node_modules"]));
        assert_eq!(cache["name"], Value::from("Saving Cache"));
        assert_eq!(cache["when"], Value::from("on_success"));
    }

    #[test]
    fn test_restore_cache_single_and_multiple_keys() {
        let single = to_value(Step::RestoreCache(RestoreCache {
            keys: "v1-repo".into(),
            name: "Restoring Cache".into(),
        }));
        assert_eq!(single["restore_cache"]["key"], Value::from("v1-repo"));
        assert!(single["restore_cache"].get("keys").is_none());

        let multiple = to_value(Step::RestoreCache(RestoreCache {
            keys: ["v1-deps-abc", "v1-deps-"].into(),
            name: "Restoring Cache".into(),
        }));
        assert_eq!(
            multiple["restore_cache"]["keys"],
            Value::from(vec!["v1-deps-abc", "v1-deps-"])
        );
        assert!(multiple["restore_cache"].get("key").is_none());
    }

    #[test]
    fn test_add_ssh_keys_marker_and_fingerprints() {
        assert_eq!(
            to_value(Step::AddSshKeys(AddSshKeys::default())),
            Value::from("add_ssh_keys")
        );

        let value = to_value(Step::AddSshKeys(AddSshKeys {
            fingerprints: vec!["so:me:fi:ng".into()],
        }));
        assert_eq!(
            value["add_ssh_keys"]["fingerprints"],
            Value::from(vec!["so:me:fi:ng"])
        );
    }

    #[test]
    fn test_store_artifacts_without_destination() {
        let value = to_value(Step::StoreArtifacts(StoreArtifacts {
            path: "coverage".into(),
            destination: None,
        }));
        let body = value["store_artifacts"].as_mapping().unwrap();
        assert_eq!(body.len(), 1);
    }
}
