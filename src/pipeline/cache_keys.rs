// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Progressive cache keys
//!
//! Turns one templated key such as `v1-deps-{{ checksum "yarn.lock" }}`
//! into a fallback chain (`v1-deps-{{ ... }}`, `v1-deps-`, `v1-`) so a
//! restore can fall back to an older, more generic cache.

use crate::errors::{ConfigError, ConfigResult};

/// Build the ordered fallback chain for `key`, most specific first
///
/// Keys are split on `-`. Each fallback drops one more trailing segment and
/// keeps the trailing dash so it only matches keys that continued past it.
/// With a `base` the chain stops at `base`; without one it stops at the
/// first segment.
pub fn progressive_keys(key: &str, base: Option<&str>) -> ConfigResult<Vec<String>> {
    if key.is_empty() {
        return Err(ConfigError::invalid_argument("Cache key must not be empty"));
    }

    let base = base.unwrap_or_default();
    if !key.starts_with(base) {
        return Err(ConfigError::invalid_argument_with_help(
            format!("Base '{}' is not a prefix of cache key '{}'", base, key),
            "The base must be a literal prefix of the key, e.g. base `v1-deps` for key `v1-deps-{{ checksum \"lock\" }}`",
        ));
    }

    let rest = &key[base.len()..];
    let stem = rest.strip_prefix('-').unwrap_or(rest);
    let lead = &key[..key.len() - stem.len()];
    let segments: Vec<&str> = stem.split('-').collect();

    let mut keys = vec![key.to_string()];
    for end in (1..segments.len()).rev() {
        push_distinct(&mut keys, format!("{}{}-", lead, segments[..end].join("-")));
    }
    if !base.is_empty() {
        push_distinct(&mut keys, base.to_string());
    }

    Ok(keys)
}

fn push_distinct(keys: &mut Vec<String>, candidate: String) {
    if keys.last() != Some(&candidate) {
        keys.push(candidate);
    }
}
