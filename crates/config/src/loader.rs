//! Configuration loader implementation

use crate::discovery::find_default_path;
use crate::env::{EnvSnapshot, EnvSource, ProcessEnv};
use crate::merge::overlay;
use crate::options::{DocumentFormat, LoadOptions};
use figment::{
    providers::{Format, Json, Serialized, Toml, Yaml},
    value::{Dict, Num, Value},
    Figment, Profile, Provider,
};
use layerconf_types::{EnvBindings, LoadError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A type that can be loaded from defaults, a config file and the environment
pub trait LayeredConfig: Serialize + DeserializeOwned + EnvBindings {}

impl<T> LayeredConfig for T where T: Serialize + DeserializeOwned + EnvBindings {}

/// Configuration loader that layers a config file and environment variables
/// over caller-supplied defaults.
///
/// Precedence is environment > file > defaults. The loader holds no state
/// besides its options, so one instance can serve any number of loads; the
/// target of a single load must not be shared while it runs.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader<E = ProcessEnv> {
    options: LoadOptions,
    env: E,
}

impl ConfigLoader<ProcessEnv> {
    /// Create a loader reading the process environment
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            env: ProcessEnv,
        }
    }
}

impl<E: EnvSource> ConfigLoader<E> {
    /// Read environment variables from `env` instead
    pub fn with_env_source<S: EnvSource>(self, env: S) -> ConfigLoader<S> {
        ConfigLoader {
            options: self.options,
            env,
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// The file a load would read: the explicit file, else the first
    /// discovered candidate, else `None`
    pub fn resolve_path(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = self.options.file() {
            return Ok(Some(path.to_path_buf()));
        }
        find_default_path(self.options.dirs(), self.options.file_names())
    }

    /// Load into a fresh default-valued `T`
    pub fn load<T>(&self) -> Result<T>
    where
        T: LayeredConfig + Default,
    {
        self.load_with_default(T::default())
    }

    /// Load over `defaults`, returning the merged value
    pub fn load_with_default<T>(&self, mut defaults: T) -> Result<T>
    where
        T: LayeredConfig,
    {
        self.load_into(&mut defaults)?;
        Ok(defaults)
    }

    /// Load into `target`, whose current values act as defaults.
    ///
    /// On error `target` may or may not have been updated.
    pub fn load_into<T>(&self, target: &mut T) -> Result<()>
    where
        T: LayeredConfig,
    {
        match self.resolve_path()? {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                apply_file(target, &path)?;
            }
            None => debug!("No configuration file found, using defaults and environment"),
        }

        let snapshot = EnvSnapshot::capture(&T::env_bindings(), &self.env)?;
        if snapshot.is_empty() {
            return Ok(());
        }

        debug!(values = snapshot.len(), "Applying environment overrides");
        *target = overlay(target, &snapshot, self.options.merge_strategy())?;
        Ok(())
    }
}

/// Layer the document at `path` over `target`
fn apply_file<T>(target: &mut T, path: &Path) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty document declares nothing
    if content.trim().is_empty() {
        debug!(path = %path.display(), "Configuration file is empty");
        return Ok(());
    }

    let parse_error = |source: figment::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    };
    let mut document = parse_document(path, &content).map_err(parse_error)?;

    // A blank key (`port:`) resets the field to its zero value. Nulls are
    // only rewritten where the field rejects them, so `Option` fields still
    // become `None`.
    let loaded: T = loop {
        let merged = Figment::from(Serialized::defaults(&*target))
            .merge(Serialized::defaults(&document));
        let error = match merged.extract() {
            Ok(loaded) => break loaded,
            Err(error) => error,
        };

        let key = error.path.join(".");
        let current = Figment::from(Serialized::defaults(&*target))
            .find_value(&key)
            .ok();
        match current {
            Some(current) if zero_null(&mut document, &error.path, &current) => {
                debug!(key = %key, "Blank config key reset to zero value");
            }
            _ => return Err(parse_error(error)),
        }
    };

    *target = loaded;
    Ok(())
}

/// Parse a config document into its top-level table
fn parse_document(path: &Path, content: &str) -> std::result::Result<Dict, figment::Error> {
    let mut data = match DocumentFormat::from_path(path) {
        DocumentFormat::Yaml => Yaml::string(content).data()?,
        DocumentFormat::Json => Json::string(content).data()?,
        DocumentFormat::Toml => Toml::string(content).data()?,
    };
    Ok(data.remove(&Profile::Default).unwrap_or_default())
}

/// Replace a null at `path` in `document` with the zero value shaped like
/// `current`. Returns whether anything changed.
fn zero_null(document: &mut Dict, path: &[String], current: &Value) -> bool {
    let Some((leaf, parents)) = path.split_last() else {
        return false;
    };
    if matches!(current, Value::Empty(..)) {
        return false;
    }

    let mut dict = document;
    for key in parents {
        match dict.get_mut(key) {
            Some(Value::Dict(_, nested)) => dict = nested,
            _ => return false,
        }
    }

    match dict.get_mut(leaf) {
        Some(slot) if matches!(slot, Value::Empty(..)) => {
            *slot = zero_like(current);
            true
        }
        _ => false,
    }
}

fn zero_like(value: &Value) -> Value {
    let tag = value.tag();
    match value {
        Value::String(..) => Value::String(tag, String::new()),
        Value::Char(..) => Value::Char(tag, '\0'),
        Value::Bool(..) => Value::Bool(tag, false),
        Value::Num(..) => Value::Num(tag, Num::U8(0)),
        Value::Array(..) => Value::Array(tag, Vec::new()),
        Value::Dict(_, dict) => Value::Dict(
            tag,
            dict.iter().map(|(k, v)| (k.clone(), zero_like(v))).collect(),
        ),
        Value::Empty(..) => value.clone(),
    }
}

/// Load a fresh `T` from the process environment and `options`
pub fn load<T>(options: &LoadOptions) -> Result<T>
where
    T: LayeredConfig + Default,
{
    ConfigLoader::new(options.clone()).load()
}

/// Load over `defaults` from the process environment and `options`
pub fn load_with_default<T>(defaults: T, options: &LoadOptions) -> Result<T>
where
    T: LayeredConfig,
{
    ConfigLoader::new(options.clone()).load_with_default(defaults)
}
