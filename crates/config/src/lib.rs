//! Layered configuration loading
//!
//! Populates a typed configuration struct from, in increasing priority,
//! caller-supplied defaults, an optional YAML/JSON/TOML file and environment
//! variables.
//!
//! ```no_run
//! use layerconf::{env_bindings, ConfigLoader, LoadOptions};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Config {
//!     host: String,
//!     port: u16,
//!     peers: Vec<String>,
//! }
//!
//! env_bindings!(Config {
//!     "host" => "APP_HOST" as Str,
//!     "port" => "APP_PORT" as UInt,
//!     "peers" => "APP_PEERS" as List,
//! });
//!
//! let options = LoadOptions::new()
//!     .with_dirs(["~/.config/app", "/etc/app"])
//!     .with_file_names(["config.yml", "config.yaml"]);
//! let config: Config = ConfigLoader::new(options).load()?;
//! # Ok::<(), layerconf::LoadError>(())
//! ```

pub mod discovery;
pub mod env;
pub mod loader;
pub mod merge;
pub mod options;

pub use discovery::{executable_dir, expand_home, find_default_path};
pub use env::{EnvSnapshot, EnvSource, EnvValue, MapEnv, ProcessEnv};
pub use loader::{load, load_with_default, ConfigLoader, LayeredConfig};
pub use merge::MergeStrategy;
pub use options::{DocumentFormat, LoadOptions};

pub use layerconf_types::{
    env_bindings, EnvBinding, EnvBindings, EnvKind, LoadError, LoadPhase, Result,
};
