//! Environment overlay merging

use crate::env::{EnvSnapshot, EnvValue};
use figment::{providers::Serialized, Figment};
use layerconf_types::{LoadError, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

/// How captured environment values are merged over the file/default layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    /// Zero values (`""`, `0`, `0.0`, `false`, empty list) count as absent and
    /// never override. An environment variable cannot reset a field to zero.
    #[default]
    SkipZero,
    /// Every set, non-empty variable overrides, zero values included.
    PresenceWins,
}

impl MergeStrategy {
    /// Whether a captured value takes part in the overlay
    pub fn overrides(self, value: &EnvValue) -> bool {
        match self {
            MergeStrategy::SkipZero => !value.is_zero(),
            MergeStrategy::PresenceWins => true,
        }
    }
}

/// Merge `snapshot` over `base`, returning the merged value.
///
/// Each captured value replaces exactly the field at its key path; sequences
/// are replaced wholesale and sibling fields of nested tables are kept.
///
/// A value the bound field's type rejects (out of range, list on a scalar) is
/// an [`LoadError::EnvBind`] naming the variable. Failures that can't be
/// traced to one captured field are [`LoadError::Merge`].
pub fn overlay<T>(base: &T, snapshot: &EnvSnapshot, strategy: MergeStrategy) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut figment = Figment::from(Serialized::defaults(base));
    for (key, value) in snapshot.iter() {
        if !strategy.overrides(value) {
            trace!(key, "Ignoring zero environment value");
            continue;
        }
        figment = figment.merge(Serialized::default(key, value));
    }

    figment.extract().map_err(|e| {
        let key = e.path.join(".");
        match snapshot.var_for(&key) {
            Some(var) => LoadError::env_bind(var, key, e.to_string()),
            None => LoadError::Merge { source: Box::new(e) },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use layerconf_types::{EnvBinding, EnvKind};
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Server {
        host: String,
        port: u16,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct App {
        name: String,
        verbose: bool,
        tags: Vec<String>,
        server: Server,
    }

    fn base() -> App {
        App {
            name: "base".into(),
            verbose: true,
            tags: vec!["x".into(), "y".into()],
            server: Server {
                host: "localhost".into(),
                port: 8080,
            },
        }
    }

    fn bindings() -> Vec<EnvBinding> {
        vec![
            EnvBinding::new("name", "NAME", EnvKind::Str),
            EnvBinding::new("verbose", "VERBOSE", EnvKind::Bool),
            EnvBinding::new("tags", "TAGS", EnvKind::List),
            EnvBinding::new("server.port", "PORT", EnvKind::UInt),
        ]
    }

    fn snapshot(env: &MapEnv) -> EnvSnapshot {
        EnvSnapshot::capture(&bindings(), env).unwrap()
    }

    #[test]
    fn test_nested_field_keeps_siblings() {
        let env = MapEnv::new().with("PORT", "9000");
        let merged = overlay(&base(), &snapshot(&env), MergeStrategy::SkipZero).unwrap();
        assert_eq!(merged.server.port, 9000);
        assert_eq!(merged.server.host, "localhost");
        assert_eq!(merged.name, "base");
    }

    #[test]
    fn test_sequence_is_replaced() {
        let env = MapEnv::new().with("TAGS", "z");
        let merged = overlay(&base(), &snapshot(&env), MergeStrategy::SkipZero).unwrap();
        assert_eq!(merged.tags, vec!["z".to_string()]);
    }

    #[test]
    fn test_skip_zero_keeps_existing() {
        let env = MapEnv::new().with("VERBOSE", "false").with("PORT", "0");
        let merged = overlay(&base(), &snapshot(&env), MergeStrategy::SkipZero).unwrap();
        assert_eq!(merged, base());
    }

    #[test]
    fn test_presence_wins_applies_zero() {
        let env = MapEnv::new().with("VERBOSE", "false").with("PORT", "0");
        let merged = overlay(&base(), &snapshot(&env), MergeStrategy::PresenceWins).unwrap();
        assert!(!merged.verbose);
        assert_eq!(merged.server.port, 0);
    }

    #[test]
    fn test_incompatible_value_is_env_bind_error() {
        // a list bound onto a string field
        let bindings = vec![EnvBinding::new("name", "NAME", EnvKind::List)];
        let env = MapEnv::new().with("NAME", "a,b");
        let snapshot = EnvSnapshot::capture(&bindings, &env).unwrap();

        let err = overlay(&base(), &snapshot, MergeStrategy::SkipZero).unwrap_err();
        assert!(matches!(err, LoadError::EnvBind { ref var, .. } if var == "NAME"));
    }

    #[test]
    fn test_out_of_range_is_env_bind_error() {
        let env = MapEnv::new().with("PORT", "70000");
        let err = overlay(&base(), &snapshot(&env), MergeStrategy::SkipZero).unwrap_err();
        match err {
            LoadError::EnvBind { var, key, .. } => {
                assert_eq!(var, "PORT");
                assert_eq!(key, "server.port");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_path_through_scalar_is_merge_error() {
        // "name" is a string, so "name.first" reshapes the document
        let bindings = vec![EnvBinding::new("name.first", "FIRST", EnvKind::Str)];
        let env = MapEnv::new().with("FIRST", "ada");
        let snapshot = EnvSnapshot::capture(&bindings, &env).unwrap();

        let err = overlay(&base(), &snapshot, MergeStrategy::SkipZero).unwrap_err();
        assert!(matches!(err, LoadError::Merge { .. }));
    }
}
