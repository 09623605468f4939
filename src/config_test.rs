use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| vars.get(key).cloned()
}

// =============================================================================
// parse_backend
// =============================================================================

#[test]
fn parse_backend_defaults_to_file() {
    let kind = parse_backend(None, PathBuf::from("a.json")).unwrap();
    assert_eq!(kind, BackendKind::File(PathBuf::from("a.json")));
}

#[test]
fn parse_backend_memory() {
    let kind = parse_backend(Some(" memory "), PathBuf::from("a.json")).unwrap();
    assert_eq!(kind, BackendKind::Memory);
}

#[test]
fn parse_backend_unknown_errors() {
    let err = parse_backend(Some("sqlite"), PathBuf::from("a.json"))
        .unwrap_err()
        .to_string();
    assert!(err.contains("unknown FRUIT_STORE_BACKEND: sqlite"));
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn from_lookup_defaults() {
    let cfg = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.backend, BackendKind::File(PathBuf::from(DEFAULT_STORE_PATH)));
}

#[test]
fn from_lookup_reads_overrides() {
    let cfg = StoreConfig::from_lookup(lookup_from(&[
        ("FRUIT_STORE_BACKEND", "file"),
        ("FRUIT_STORE_PATH", "/var/lib/fruit/store.json"),
    ]))
    .unwrap();
    assert_eq!(cfg.backend, BackendKind::File(PathBuf::from("/var/lib/fruit/store.json")));
}

#[test]
fn from_lookup_blank_path_uses_default() {
    let cfg = StoreConfig::from_lookup(lookup_from(&[("FRUIT_STORE_PATH", "   ")])).unwrap();
    assert_eq!(cfg.backend, BackendKind::File(PathBuf::from(DEFAULT_STORE_PATH)));
}

#[test]
fn from_lookup_memory_ignores_path() {
    let cfg = StoreConfig::from_lookup(lookup_from(&[
        ("FRUIT_STORE_BACKEND", "memory"),
        ("FRUIT_STORE_PATH", "unused.json"),
    ]))
    .unwrap();
    assert_eq!(cfg.backend, BackendKind::Memory);
}

#[test]
fn from_lookup_unknown_backend_errors() {
    let err = StoreConfig::from_lookup(lookup_from(&[("FRUIT_STORE_BACKEND", "cloud")])).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownBackend(ref kind) if kind == "cloud"));
}

#[tokio::test]
async fn memory_backend_builds_empty_store() {
    let cfg = StoreConfig { backend: BackendKind::Memory };
    let backend = cfg.build_backend();
    assert_eq!(backend.get("fruit").await.unwrap(), None);
}
