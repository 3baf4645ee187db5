//! Environment variable bindings for configuration fields

use std::fmt;

/// Semantic type an environment variable is converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKind {
    /// Raw string value
    Str,
    /// Signed integer
    Int,
    /// Unsigned integer
    UInt,
    /// Floating point number
    Float,
    /// Boolean (`1`/`0`, `t`/`f`, `true`/`false` in any of the usual cases)
    Bool,
    /// Comma-separated list of strings
    List,
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvKind::Str => "string",
            EnvKind::Int => "integer",
            EnvKind::UInt => "unsigned integer",
            EnvKind::Float => "float",
            EnvKind::Bool => "boolean",
            EnvKind::List => "list",
        };
        f.write_str(name)
    }
}

/// Binding of one configuration field to one environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvBinding {
    /// Dotted path of the field as it appears in the config document
    pub key: String,
    /// Name of the environment variable
    pub var: String,
    /// Type the variable is converted to
    pub kind: EnvKind,
}

impl EnvBinding {
    /// Create a new binding
    pub fn new(key: impl Into<String>, var: impl Into<String>, kind: EnvKind) -> Self {
        Self {
            key: key.into(),
            var: var.into(),
            kind,
        }
    }

    /// Path segments of the bound key
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.key.split('.')
    }
}

/// Types whose fields can be populated from environment variables.
///
/// Rust has no runtime view of field attributes, so every bindable field is
/// declared here explicitly. Fields without a binding are only ever sourced
/// from defaults and the config file. Most implementations are generated with
/// [`env_bindings!`](crate::env_bindings).
pub trait EnvBindings {
    /// Bindings for every environment-sourced field
    fn env_bindings() -> Vec<EnvBinding>;
}

/// Implement [`EnvBindings`] for a config type.
///
/// ```
/// use layerconf_types::{env_bindings, EnvBindings, EnvKind};
///
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// env_bindings!(Server {
///     "host" => "APP_HOST" as Str,
///     "port" => "APP_PORT" as UInt,
/// });
///
/// let bindings = Server::env_bindings();
/// assert_eq!(bindings[1].var, "APP_PORT");
/// assert_eq!(bindings[1].kind, EnvKind::UInt);
/// ```
#[macro_export]
macro_rules! env_bindings {
    ($ty:ty { $($key:literal => $var:literal as $kind:ident),* $(,)? }) => {
        impl $crate::EnvBindings for $ty {
            fn env_bindings() -> ::std::vec::Vec<$crate::EnvBinding> {
                ::std::vec![
                    $($crate::EnvBinding::new($key, $var, $crate::EnvKind::$kind)),*
                ]
            }
        }
    };
}
