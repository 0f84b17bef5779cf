// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Job executors
//!
//! An executor describes the environment a job runs in. The set of
//! variants is closed: containers, a virtual machine, or hosted macOS.

mod docker;
mod machine;
mod macos;

pub use docker::{Auth, AwsAuth, Docker, Image, ImageBuilder};
pub use machine::Machine;
pub use macos::{MacOs, XcodeVersion};

use serde_yaml::{Mapping, Value};

use crate::errors::ConfigResult;

/// The run environment of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executor {
    Docker(Docker),
    Machine(Machine),
    MacOs(MacOs),
}

impl Executor {
    /// Key the executor occupies in a job body
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Docker(_) => "docker",
            Self::Machine(_) => "machine",
            Self::MacOs(_) => "macos",
        }
    }

    /// Produce the single-key fragment merged into a job body
    pub fn compose(&self) -> ConfigResult<Mapping> {
        let body = match self {
            Self::Docker(docker) => serde_yaml::to_value(docker.images())?,
            Self::Machine(machine) => serde_yaml::to_value(machine)?,
            Self::MacOs(macos) => serde_yaml::to_value(macos)?,
        };

        let mut fragment = Mapping::new();
        fragment.insert(Value::from(self.kind()), body);
        Ok(fragment)
    }
}

impl From<Docker> for Executor {
    fn from(docker: Docker) -> Self {
        Self::Docker(docker)
    }
}

impl From<Machine> for Executor {
    fn from(machine: Machine) -> Self {
        Self::Machine(machine)
    }
}

impl From<MacOs> for Executor {
    fn from(macos: MacOs) -> Self {
        Self::MacOs(macos)
    }
}
