// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Hosted macOS executor

use serde::Serialize;
use std::str::FromStr;

use crate::errors::{ConfigError, ConfigResult};

/// Xcode versions offered by the hosted macOS fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum XcodeVersion {
    #[serde(rename = "9.4.0")]
    V9_4_0,
    #[serde(rename = "9.3.1")]
    V9_3_1,
    #[serde(rename = "9.3.0")]
    V9_3_0,
    #[serde(rename = "9.2.0")]
    V9_2_0,
    #[serde(rename = "9.1.0")]
    V9_1_0,
    #[serde(rename = "9.0.1")]
    V9_0_1,
    #[serde(rename = "8.3.3")]
    V8_3_3,
}

impl XcodeVersion {
    /// Every supported version, newest first
    pub const ALL: [XcodeVersion; 7] = [
        Self::V9_4_0,
        Self::V9_3_1,
        Self::V9_3_0,
        Self::V9_2_0,
        Self::V9_1_0,
        Self::V9_0_1,
        Self::V8_3_3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V9_4_0 => "9.4.0",
            Self::V9_3_1 => "9.3.1",
            Self::V9_3_0 => "9.3.0",
            Self::V9_2_0 => "9.2.0",
            Self::V9_1_0 => "9.1.0",
            Self::V9_0_1 => "9.0.1",
            Self::V8_3_3 => "8.3.3",
        }
    }
}

impl std::fmt::Display for XcodeVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for XcodeVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| ConfigError::InvalidConfiguration {
                reason: format!("Unsupported Xcode version '{}'", s),
                help: Some(format!(
                    "Supported versions: {}",
                    Self::ALL.map(|v| v.as_str()).join(", ")
                )),
            })
    }
}

/// Executor running a job on a hosted macOS machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacOs {
    xcode: XcodeVersion,
}

impl MacOs {
    /// Create an executor from a version string such as `"9.4.0"`
    pub fn new(version: &str) -> ConfigResult<Self> {
        Ok(Self::with_version(version.parse()?))
    }

    pub fn with_version(xcode: XcodeVersion) -> Self {
        Self { xcode }
    }

    pub fn xcode(&self) -> XcodeVersion {
        self.xcode
    }
}
