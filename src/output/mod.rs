// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Document output
//!
//! Serializers turn a composed document into text; writers persist that
//! text. Both sit behind traits so callers can swap them out.

mod format;
mod writer;

pub use format::{DocumentFormat, JsonFormat, YamlFormat};
pub use writer::{FileWriter, OutputWriter};
