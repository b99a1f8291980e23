// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! File-based mapper settings.
//!
//! ```toml
//! array_shape = "System.Collections.Generic.IEnumerable"
//! record_shape = "System.Collections.Generic.IDictionary"
//! ignore = ["System.Object"]
//! exclude = ["Vendor.*"]
//! include = ["App.Models.AuditEntry"]
//! promise = ["System.Threading.Tasks.Task"]
//!
//! [base_types]
//! "System.Int32" = "number"
//! "System.String" = "string"
//! ```
//!
//! Type names are full names (`Namespace.Name`). `ignore`, `exclude`,
//! `array_like`, `record_like` and `promise` accept `*`/`?` glob patterns.

use super::MapperConfig;
use crate::catalog::TypeCatalog;
use crate::descriptor::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown type `{name}` in `{section}`")]
    UnknownType { name: String, section: &'static str },
}

/// Mapper settings as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperSettings {
    /// Open generic sequence definition (one parameter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_shape: Option<String>,

    /// Open generic key/value definition (two parameters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_shape: Option<String>,

    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub array_like: Vec<String>,

    #[serde(default)]
    pub record_like: Vec<String>,

    #[serde(default)]
    pub promise: Vec<String>,

    /// Full type name to base type name.
    #[serde(default)]
    pub base_types: BTreeMap<String, String>,
}

impl MapperSettings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lists: [(&str, &Vec<String>); 6] = [
            ("ignore", &self.ignore),
            ("exclude", &self.exclude),
            ("include", &self.include),
            ("array_like", &self.array_like),
            ("record_like", &self.record_like),
            ("promise", &self.promise),
        ];
        for (section, entries) in lists {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "`{}` contains an empty entry",
                    section
                )));
            }
        }

        for (i, entry) in self.include.iter().enumerate() {
            if is_pattern(entry) {
                return Err(ConfigError::Invalid(format!(
                    "include entry {} (`{}`) must be an exact type name",
                    i, entry
                )));
            }
        }

        for (ty, name) in &self.base_types {
            if ty.trim().is_empty() {
                return Err(ConfigError::Invalid("base type with empty type name".into()));
            }
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "base type `{}` maps to an empty name",
                    ty
                )));
            }
        }

        for shape in [&self.array_shape, &self.record_shape].into_iter().flatten() {
            if shape.trim().is_empty() || is_pattern(shape) {
                return Err(ConfigError::Invalid(format!(
                    "shape `{}` must be an exact type name",
                    shape
                )));
            }
        }

        Ok(())
    }

    /// Resolve names against `catalog` into a [`MapperConfig`].
    ///
    /// Exact names must exist; patterns may match nothing.
    pub fn resolve(&self, catalog: &TypeCatalog) -> Result<MapperConfig, ConfigError> {
        self.validate()?;

        let exact = |name: &str, section: &'static str| {
            catalog.lookup(name).ok_or_else(|| ConfigError::UnknownType {
                name: name.to_string(),
                section,
            })
        };

        let mut config = MapperConfig::new();
        for (ty, name) in &self.base_types {
            config.add_base_type(exact(ty, "base_types")?, name.clone());
        }
        for name in &self.include {
            config.add_include(exact(name, "include")?);
        }
        if let Some(shape) = &self.array_shape {
            config = config.array_shape(exact(shape, "array_shape")?);
        }
        if let Some(shape) = &self.record_shape {
            config = config.record_shape(exact(shape, "record_shape")?);
        }

        for (section, patterns) in [
            ("array_like", &self.array_like),
            ("record_like", &self.record_like),
            ("promise", &self.promise),
        ] {
            for pattern in patterns {
                let matched = matching(catalog, pattern);
                if matched.is_empty() && !is_pattern(pattern) {
                    return Err(ConfigError::UnknownType {
                        name: pattern.clone(),
                        section,
                    });
                }
                for ty in matched {
                    config = match section {
                        "array_like" => config.mark_array(ty),
                        "record_like" => config.mark_record(ty),
                        _ => config.mark_promise(ty),
                    };
                }
            }
        }

        if !self.ignore.is_empty() {
            let patterns = Arc::new(self.ignore.clone());
            config.add_ignore(Arc::new(move |_: crate::descriptor::TypeId, d: &TypeDescriptor| {
                matches_any(&patterns, &d.full_name())
            }));
        }
        if !self.exclude.is_empty() {
            let patterns = Arc::new(self.exclude.clone());
            config.add_exclude(Arc::new(move |_: crate::descriptor::TypeId, d: &TypeDescriptor| {
                matches_any(&patterns, &d.full_name())
            }));
        }

        Ok(config)
    }

    /// Documented sample settings.
    pub fn example() -> Self {
        let mut base_types = BTreeMap::new();
        for (ty, name) in [
            ("System.Boolean", "boolean"),
            ("System.Int32", "number"),
            ("System.Int64", "number"),
            ("System.Double", "number"),
            ("System.Decimal", "number"),
            ("System.String", "string"),
            ("System.Guid", "string"),
            ("System.DateTime", "Date"),
        ] {
            base_types.insert(ty.to_string(), name.to_string());
        }
        Self {
            array_shape: Some("System.Collections.Generic.IEnumerable".into()),
            record_shape: Some("System.Collections.Generic.IDictionary".into()),
            ignore: vec!["System.Object".into()],
            exclude: vec!["System.Reflection.*".into()],
            include: Vec::new(),
            array_like: Vec::new(),
            record_like: Vec::new(),
            promise: vec!["System.Threading.Tasks.Task".into()],
            base_types,
        }
    }
}

fn is_pattern(entry: &str) -> bool {
    entry.contains('*') || entry.contains('?')
}

fn matches_any(patterns: &[String], name: &str) -> bool {
    patterns.iter().any(|p| glob_match(p, name))
}

/// Declared types whose full name matches `pattern`.
fn matching(catalog: &TypeCatalog, pattern: &str) -> Vec<crate::descriptor::TypeId> {
    catalog
        .declared_names()
        .into_iter()
        .filter(|name| glob_match(pattern, name))
        .filter_map(|name| catalog.lookup(name))
        .collect()
}

/// Glob matching with `*` (any run) and `?` (one character).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
