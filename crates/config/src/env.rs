//! Environment variable binding
//!
//! Captures the variables named by a type's [`EnvBindings`] into an
//! [`EnvSnapshot`]: a sparse, typed view of the environment holding only the
//! fields whose variable is actually set.
//!
//! Conversion rules:
//! - empty values are treated as unset, and so are whitespace-only values
//!   for every kind except strings
//! - numbers and booleans are trimmed before parsing
//! - booleans accept `1 t T TRUE true True` and `0 f F FALSE false False`
//! - lists are comma-separated, items trimmed, empty items dropped
//!
//! [`EnvBindings`]: layerconf_types::EnvBindings

use layerconf_types::{EnvBinding, EnvKind, LoadError, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Source of environment variable values
pub trait EnvSource {
    /// Value of `name`, or `None` when it is not set
    fn var(&self, name: &str) -> Option<String>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        // Non-unicode values can't be bound to any kind
        std::env::var(name).ok()
    }
}

/// In-memory environment, for tests and embedders that own their variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MapEnv::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a variable
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// A converted environment value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl EnvValue {
    /// Convert a raw variable value to `kind`
    pub fn parse(kind: EnvKind, raw: &str) -> std::result::Result<Self, String> {
        let trimmed = raw.trim();
        let invalid = |e: &dyn std::fmt::Display| format!("invalid {kind} {trimmed:?}: {e}");
        let value = match kind {
            EnvKind::Str => EnvValue::Str(raw.to_string()),
            EnvKind::Int => EnvValue::Int(trimmed.parse().map_err(|e| invalid(&e))?),
            EnvKind::UInt => EnvValue::UInt(trimmed.parse().map_err(|e| invalid(&e))?),
            EnvKind::Float => EnvValue::Float(trimmed.parse().map_err(|e| invalid(&e))?),
            EnvKind::Bool => EnvValue::Bool(
                parse_bool(trimmed).ok_or_else(|| format!("invalid {kind} {trimmed:?}"))?,
            ),
            EnvKind::List => EnvValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };
        Ok(value)
    }

    /// Whether this is the zero value of its kind
    pub fn is_zero(&self) -> bool {
        match self {
            EnvValue::Str(s) => s.is_empty(),
            EnvValue::Int(n) => *n == 0,
            EnvValue::UInt(n) => *n == 0,
            EnvValue::Float(n) => *n == 0.0,
            EnvValue::Bool(b) => !b,
            EnvValue::List(items) => items.is_empty(),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Environment values captured for one load, keyed by field path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvSnapshot {
    entries: Vec<Captured>,
}

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    key: String,
    var: String,
    value: EnvValue,
}

impl EnvSnapshot {
    /// Capture every bound variable that is set in `source`.
    ///
    /// Malformed bindings fail even when their variable is unset, so a broken
    /// declaration surfaces on the first load rather than on the first deploy
    /// that happens to set the variable.
    pub fn capture<S: EnvSource + ?Sized>(bindings: &[EnvBinding], source: &S) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for binding in bindings {
            check_binding(binding)?;
            if !seen.insert(binding.key.as_str()) {
                let reason = "field is bound more than once";
                return Err(LoadError::env_bind(&binding.var, &binding.key, reason));
            }

            let Some(raw) = source.var(&binding.var) else {
                continue;
            };
            if is_unset(binding.kind, &raw) {
                continue;
            }

            let value = EnvValue::parse(binding.kind, &raw)
                .map_err(|reason| LoadError::env_bind(&binding.var, &binding.key, reason))?;
            trace!(var = %binding.var, key = %binding.key, "Captured environment value");
            entries.push(Captured {
                key: binding.key.clone(),
                var: binding.var.clone(),
                value,
            });
        }

        Ok(Self { entries })
    }

    /// Captured value for a field path
    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.find(key).map(|c| &c.value)
    }

    /// Variable a field path was captured from
    pub fn var_for(&self, key: &str) -> Option<&str> {
        self.find(key).map(|c| c.var.as_str())
    }

    fn find(&self, key: &str) -> Option<&Captured> {
        self.entries.iter().find(|c| c.key == key)
    }

    /// Captured values in binding order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvValue)> {
        self.entries.iter().map(|c| (c.key.as_str(), &c.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Strings keep their whitespace, so only an empty string is unset.
fn is_unset(kind: EnvKind, raw: &str) -> bool {
    match kind {
        EnvKind::Str => raw.is_empty(),
        _ => raw.trim().is_empty(),
    }
}

fn check_binding(binding: &EnvBinding) -> Result<()> {
    if binding.var.is_empty() || binding.var.contains(['=', '\0']) {
        return Err(LoadError::env_bind(&binding.var, &binding.key, "invalid variable name"));
    }
    if binding.segments().any(str::is_empty) {
        return Err(LoadError::env_bind(&binding.var, &binding.key, "invalid field path"));
    }
    Ok(())
}
