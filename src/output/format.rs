// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Text formats for composed documents

use serde_yaml::Value;

use crate::errors::ConfigResult;

/// Converts between a composed document and its text form
pub trait DocumentFormat: Send + Sync {
    /// Short format name, e.g. `yaml`
    fn name(&self) -> &'static str;

    /// Render `document` without modifying it
    fn serialize(&self, document: &Value) -> ConfigResult<String>;

    /// Parse text produced by [`DocumentFormat::serialize`]
    fn parse(&self, text: &str) -> ConfigResult<Value>;
}

/// YAML, the provider's native format
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl DocumentFormat for YamlFormat {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn serialize(&self, document: &Value) -> ConfigResult<String> {
        serde_yaml::to_string(document).map_err(Into::into)
    }

    fn parse(&self, text: &str) -> ConfigResult<Value> {
        serde_yaml::from_str(text).map_err(Into::into)
    }
}

/// Pretty-printed JSON; every JSON document is also valid YAML
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl DocumentFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, document: &Value) -> ConfigResult<String> {
        serde_json::to_string_pretty(document).map_err(Into::into)
    }

    fn parse(&self, text: &str) -> ConfigResult<Value> {
        serde_json::from_str(text).map_err(Into::into)
    }
}
