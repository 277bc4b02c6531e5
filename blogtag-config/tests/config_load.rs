use blogtag_common::observability::LogFormat;
use blogtag_common::BlogtagError;
use blogtag_config::{load_url_list, BlogtagConfigLoader, UrlListError};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
articles_dir: blog-cache
rosters:
  speakers: "${ROSTER_ROOT}/{year}/speakers.yml"
  presentations: "${ROSTER_ROOT}/{year}/presentations.yml"
http:
  timeout_secs: 10
extract:
  selectors: [".entry-content"]
logging:
  format: json
  emit_stderr: true
"#;
    let p = write_yaml(&tmp, "blogtag.yaml", file_yaml);

    let config = temp_env::with_var("ROSTER_ROOT", Some("/srv/rosters"), || {
        BlogtagConfigLoader::new()
            .with_file(p)
            .load()
            .expect("load config")
    });

    assert_eq!(config.articles_dir, PathBuf::from("blog-cache"));
    assert_eq!(config.rosters.speakers, "/srv/rosters/{year}/speakers.yml");
    assert_eq!(config.http.timeout_secs, Some(10));
    assert_eq!(config.extract.selectors, vec![".entry-content".to_string()]);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.logging.emit_stderr);
    // untouched sections keep their defaults
    assert!(!config.tagging.dedup);
    assert_eq!(config.logging.filter, "info");
    assert_eq!(
        config.url_list_path("2024"),
        PathBuf::from("blog-cache/2024/urls.yaml")
    );
}

#[test]
#[serial]
fn env_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "blogtag.yaml", "tagging:\n  dedup: false\n");

    let config = temp_env::with_vars(
        [
            ("BLOGTAG__TAGGING__DEDUP", Some("true")),
            ("BLOGTAG__LOGGING__FILTER", Some("debug")),
        ],
        || BlogtagConfigLoader::new().with_file(&p).load().unwrap(),
    );

    assert!(config.tagging.dedup);
    assert_eq!(config.logging.filter, "debug");
}

#[test]
#[serial]
fn optional_file_may_be_absent() {
    let tmp = TempDir::new().unwrap();
    let config = BlogtagConfigLoader::new()
        .with_optional_file(tmp.path().join("missing.yaml"))
        .load()
        .expect("defaults");
    assert_eq!(config.articles_dir, PathBuf::from("articles"));
    assert_eq!(config.extract.selectors.first().map(String::as_str), Some("article"));
}

#[test]
#[serial]
fn required_file_must_exist() {
    let tmp = TempDir::new().unwrap();
    let err = BlogtagConfigLoader::new()
        .with_file(tmp.path().join("missing.yaml"))
        .load();
    assert!(err.is_err());
}

#[test]
fn url_list_preserves_file_order() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "2024/urls.yaml",
        "- https://blog.example/z\n- https://blog.example/a\n- https://blog.example/m\n",
    );
    let urls = load_url_list(&p).unwrap();
    assert_eq!(
        urls,
        vec![
            "https://blog.example/z",
            "https://blog.example/a",
            "https://blog.example/m"
        ]
    );
}

#[test]
fn missing_url_list_maps_to_configuration_missing() {
    let tmp = TempDir::new().unwrap();
    let p = tmp.path().join("2030").join("urls.yaml");
    let err = load_url_list(&p).unwrap_err();
    assert!(matches!(err, UrlListError::Missing(_)));

    let run_err: BlogtagError = err.into();
    assert!(matches!(run_err, BlogtagError::ConfigurationMissing(_)));
    assert!(run_err.to_string().ends_with("urls.yaml not found."));
}

#[test]
fn malformed_url_list_is_a_parse_failure() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "urls.yaml", "- [unterminated\n");
    let err: BlogtagError = load_url_list(&p).unwrap_err().into();
    assert!(matches!(err, BlogtagError::Parse { .. }));
}
