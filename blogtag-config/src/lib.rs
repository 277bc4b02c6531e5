//! Loader for blogtag configuration with YAML + environment overlays.
//!
//! Two documents are read here:
//!
//! - `blogtag.yaml` (optional): where rosters live, where articles are cached,
//!   and how fetching, extraction, tagging and logging behave. Every field has
//!   a default, so a missing file yields a usable configuration. Environment
//!   variables prefixed `BLOGTAG__` override file values (`BLOGTAG__TAGGING__DEDUP=true`),
//!   and `${VAR}` placeholders inside string values are expanded afterwards.
//! - `<articles_dir>/<scope>/urls.yaml`: the ordered list of article URLs for
//!   one run, see [`load_url_list`].
use blogtag_common::observability::LogFormat;
use blogtag_common::BlogtagError;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CONFIG_FILE: &str = "blogtag.yaml";
pub const URL_LIST_FILE: &str = "urls.yaml";

const RUBYKAIGI_STATIC: &str =
    "https://raw.githubusercontent.com/ruby-no-kai/rubykaigi-static/refs/heads/master";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlogtagConfig {
    /// Root under which each scope keeps its `urls.yaml` and cached articles.
    pub articles_dir: PathBuf,
    pub rosters: RosterLocations,
    pub http: HttpSettings,
    pub extract: ExtractSettings,
    pub tagging: TaggingSettings,
    pub logging: LoggingSettings,
}

impl Default for BlogtagConfig {
    fn default() -> Self {
        Self {
            articles_dir: PathBuf::from("articles"),
            rosters: RosterLocations::default(),
            http: HttpSettings::default(),
            extract: ExtractSettings::default(),
            tagging: TaggingSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl BlogtagConfig {
    /// Directory holding the URL list and cached articles for `scope`.
    pub fn scope_dir(&self, scope: &str) -> PathBuf {
        self.articles_dir.join(scope)
    }

    /// Path of the URL list for `scope`.
    pub fn url_list_path(&self, scope: &str) -> PathBuf {
        self.scope_dir(scope).join(URL_LIST_FILE)
    }
}

/// Roster document locations. `{year}` is replaced by the run's scope.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RosterLocations {
    pub speakers: String,
    pub presentations: String,
}

impl Default for RosterLocations {
    fn default() -> Self {
        Self {
            speakers: format!("{RUBYKAIGI_STATIC}/{{year}}/data/speakers.yml"),
            presentations: format!("{RUBYKAIGI_STATIC}/{{year}}/data/presentations.yml"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Unset means requests may block indefinitely.
    pub timeout_secs: Option<u64>,
    /// Unset sends the HTTP client's own `blogtag/<version>` agent.
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// CSS selectors tried in order; the first one present marks the article body.
    pub selectors: Vec<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            selectors: [
                "article",
                "main",
                "[role=\"main\"]",
                ".entry-content",
                ".post-content",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaggingSettings {
    pub dedup: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: LogFormat,
    pub emit_stderr: bool,
    pub filter: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: false,
            filter: "info".to_string(),
            dir: None,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct BlogtagConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for BlogtagConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogtagConfigLoader {
    /// Start from defaults with `BLOGTAG__` env overrides.
    ///
    /// ```
    /// use blogtag_config::BlogtagConfigLoader;
    ///
    /// let config = BlogtagConfigLoader::new()
    ///     .with_yaml_str("articles_dir: out")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.articles_dir, std::path::PathBuf::from("out"));
    /// assert!(!config.tagging.dedup);
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder();
        Self { builder }
    }

    /// Attach a config file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a config file that is skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use blogtag_config::BlogtagConfigLoader;
    ///
    /// let cfg = BlogtagConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// rosters:
    ///   speakers: "data/{year}/speakers.yml"
    ///   presentations: "data/{year}/presentations.yml"
    /// tagging:
    ///   dedup: true
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.rosters.speakers, "data/{year}/speakers.yml");
    /// assert!(cfg.tagging.dedup);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// `BLOGTAG__`-prefixed environment variables are layered last so they win
    /// over every file and snippet, then `${VAR}` placeholders are expanded.
    pub fn load(self) -> Result<BlogtagConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("BLOGTAG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: BlogtagConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        tracing::debug!(
            articles_dir = %typed.articles_dir.display(),
            speakers = %typed.rosters.speakers,
            presentations = %typed.rosters.presentations,
            dedup = typed.tagging.dedup,
            "config.loaded"
        );
        Ok(typed)
    }
}

// ==============================
// URL list
// ==============================

#[derive(Debug, thiserror::Error)]
pub enum UrlListError {
    #[error("{} not found.", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl From<UrlListError> for BlogtagError {
    fn from(e: UrlListError) -> Self {
        match e {
            UrlListError::Missing(path) => BlogtagError::ConfigurationMissing(path),
            UrlListError::Io { path, source } => BlogtagError::Config(format!(
                "failed to read {}: {source}",
                path.display()
            )),
            UrlListError::Parse { path, source } => BlogtagError::Parse {
                target: path.display().to_string(),
                message: source.to_string(),
            },
        }
    }
}

/// Parse a URL list document: a YAML sequence of strings, in run order.
///
/// An empty document is an empty list.
///
/// ```
/// let urls = blogtag_config::parse_url_list("- https://a.example/1\n- https://b.example/2\n").unwrap();
/// assert_eq!(urls, vec!["https://a.example/1", "https://b.example/2"]);
/// ```
pub fn parse_url_list(yaml: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let urls: Option<Vec<String>> = serde_yaml::from_str(yaml)?;
    Ok(urls.unwrap_or_default())
}

/// Read the URL list at `path`; a missing file is [`UrlListError::Missing`].
pub fn load_url_list(path: &Path) -> Result<Vec<String>, UrlListError> {
    if !path.exists() {
        return Err(UrlListError::Missing(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path).map_err(|source| UrlListError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let urls = parse_url_list(&raw).map_err(|source| UrlListError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = urls.len(), "config.url_list.loaded");
    Ok(urls)
}
