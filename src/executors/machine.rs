// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Virtual machine executor

use serde::Serialize;

const DEFAULT_IMAGE: &str = "circleci/classic:latest";

/// Executor running a job in a dedicated virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Machine {
    enabled: bool,
    image: String,
    docker_layer_caching: bool,
}

impl Default for Machine {
    fn default() -> Self {
        Self {
            enabled: true,
            image: DEFAULT_IMAGE.to_string(),
            docker_layer_caching: false,
        }
    }
}

impl Machine {
    /// Create an enabled machine executor on the classic image
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn enabled(&self, enabled: bool) -> Self {
        Self {
            enabled,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn image(&self, image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn docker_layer_caching(&self, enabled: bool) -> Self {
        Self {
            docker_layer_caching: enabled,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_defaults() {
        let value = serde_yaml::to_value(Machine::new()).unwrap();
        assert_eq!(value["enabled"], Value::from(true));
        assert_eq!(value["image"], Value::from("circleci/classic:latest"));
        assert_eq!(value["docker_layer_caching"], Value::from(false));
    }

    #[test]
    fn test_setters_return_new_values() {
        let base = Machine::new();
        let custom = base
            .image("ubuntu-1604:201903-01")
            .docker_layer_caching(true)
            .enabled(false);

        assert_eq!(base, Machine::new());
        let value = serde_yaml::to_value(&custom).unwrap();
        assert_eq!(value["image"], Value::from("ubuntu-1604:201903-01"));
        assert_eq!(value["docker_layer_caching"], Value::from(true));
        assert_eq!(value["enabled"], Value::from(false));
    }
}
