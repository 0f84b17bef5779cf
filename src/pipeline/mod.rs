// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Pipeline builder
//!
//! Immutable values for jobs, workflows and filters, composed bottom-up into
//! a single configuration document by [`Config`].

mod cache_keys;
mod config;
mod filter;
mod job;
mod registry;
mod step;
mod workflow;

pub use cache_keys::progressive_keys;
pub use config::{Config, DEFAULT_OUTPUT_LOCATION, SCHEMA_VERSION};
pub use filter::{Filter, Patterns};
pub use job::{Job, JobType, ResourceClass};
pub use registry::NameRegistry;
pub use step::{
    AddSshKeys, AttachWorkspace, CacheKeys, Checkout, PersistToWorkspace, RestoreCache,
    RunCommand, RunConfig, SaveCache, SetupRemoteDocker, Step, StoreArtifacts,
    StoreTestResults, When,
};
pub use workflow::{JobEdge, Schedule, Workflow};
