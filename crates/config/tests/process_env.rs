//! Loads against the real process environment

use layerconf::{env_bindings, load, load_with_default, LoadError, LoadOptions};
use serde::{Deserialize, Serialize};
use serial_test::serial;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Settings {
    host: String,
    port: u16,
    verbose: bool,
    peers: Vec<String>,
}

env_bindings!(Settings {
    "host" => "LAYERCONF_TEST_HOST" as Str,
    "port" => "LAYERCONF_TEST_PORT" as UInt,
    "verbose" => "LAYERCONF_TEST_VERBOSE" as Bool,
    "peers" => "LAYERCONF_TEST_PEERS" as List,
});

const VARS: [&str; 4] = [
    "LAYERCONF_TEST_HOST",
    "LAYERCONF_TEST_PORT",
    "LAYERCONF_TEST_VERBOSE",
    "LAYERCONF_TEST_PEERS",
];

fn unset_all<F: FnOnce()>(f: F) {
    temp_env::with_vars_unset(VARS, f);
}

#[test]
#[serial]
fn test_process_env_overrides_defaults() {
    unset_all(|| {
        temp_env::with_vars(
            [
                ("LAYERCONF_TEST_PORT", Some("9443")),
                ("LAYERCONF_TEST_PEERS", Some("a.internal,b.internal")),
            ],
            || {
                let defaults = Settings {
                    host: "localhost".into(),
                    port: 8080,
                    ..Default::default()
                };
                let settings = load_with_default(defaults, &LoadOptions::new()).unwrap();
                assert_eq!(settings.host, "localhost");
                assert_eq!(settings.port, 9443);
                assert_eq!(settings.peers, ["a.internal", "b.internal"]);
            },
        );
    });
}

#[test]
#[serial]
fn test_process_env_unset_leaves_zero_values() {
    unset_all(|| {
        let settings: Settings = load(&LoadOptions::new()).unwrap();
        assert_eq!(settings, Settings::default());
    });
}

#[test]
#[serial]
fn test_process_env_empty_value_is_unset() {
    unset_all(|| {
        temp_env::with_var("LAYERCONF_TEST_HOST", Some(""), || {
            let defaults = Settings {
                host: "localhost".into(),
                ..Default::default()
            };
            let settings = load_with_default(defaults, &LoadOptions::new()).unwrap();
            assert_eq!(settings.host, "localhost");
        });
    });
}

#[test]
#[serial]
fn test_process_env_bad_boolean() {
    unset_all(|| {
        temp_env::with_var("LAYERCONF_TEST_VERBOSE", Some("sometimes"), || {
            let err = load::<Settings>(&LoadOptions::new()).unwrap_err();
            assert!(
                matches!(err, LoadError::EnvBind { ref var, .. } if var == "LAYERCONF_TEST_VERBOSE")
            );
        });
    });
}
