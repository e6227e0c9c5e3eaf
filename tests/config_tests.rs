// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::config::{BackendKind, Settings, ENV_BACKEND, ENV_DB, ENV_KEY, ENV_URL};
use pocketbook::errors::ConfigError;
use std::collections::HashMap;
use std::path::PathBuf;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_to_sqlite() {
    let s = Settings::from_lookup(lookup(&[])).unwrap();
    assert_eq!(s.backend, BackendKind::Sqlite);
    assert!(s.rest.is_none());
    assert!(s.db_path.is_none());
}

#[test]
fn db_override_is_used() {
    let s = Settings::from_lookup(lookup(&[(ENV_BACKEND, "memory"), (ENV_DB, "/tmp/x.sqlite")]))
        .unwrap();
    assert_eq!(s.backend, BackendKind::Memory);
    assert_eq!(s.resolved_db_path().unwrap(), PathBuf::from("/tmp/x.sqlite"));
}

#[test]
fn rest_requires_url_and_key() {
    let err = Settings::from_lookup(lookup(&[(ENV_BACKEND, "rest")])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(k) if k == ENV_URL));

    let err = Settings::from_lookup(lookup(&[
        (ENV_BACKEND, "rest"),
        (ENV_URL, "https://x.example.co"),
        (ENV_KEY, "   "),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Missing(k) if k == ENV_KEY));

    let err = Settings::from_lookup(lookup(&[
        (ENV_BACKEND, "rest"),
        (ENV_URL, "x.example.co"),
        (ENV_KEY, "anon"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidUrl(_)));

    let ok = Settings::from_lookup(lookup(&[
        (ENV_BACKEND, "REST"),
        (ENV_URL, "https://x.example.co/"),
        (ENV_KEY, "anon"),
    ]))
    .unwrap();
    assert_eq!(ok.rest.unwrap().api_key, "anon");
}

#[test]
fn unknown_backend_is_an_error() {
    let err = Settings::from_lookup(lookup(&[(ENV_BACKEND, "postgres")])).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownBackend(b) if b == "postgres"));
}
