//! Configuration Management
//!
//! Label definition files, the remove list, and repository credentials

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout applied to every GitHub call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Filename prefix marking the remove list
pub const REMOVE_FILE_PREFIX: &str = "_remove";

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding the repository owner
pub const OWNER_ENV: &str = "GITHUB_REPO_OWNER";

/// Environment variable holding the repository name
pub const REPO_ENV: &str = "GITHUB_REPO_NAME";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// Label Record
///
/// The canonical form of a label: only these three fields take part in
/// comparisons between config and remote.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LabelRecord {
    /// Label name (unique, case-sensitive)
    pub name: String,

    /// Label color (6-digit hex, without #)
    pub color: String,

    /// Label description (empty when unset)
    pub description: String,
}

impl LabelRecord {
    /// Create a new label record, normalizing the color
    pub fn new(
        name: impl Into<String>,
        color: impl AsRef<str>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            color: Self::normalize_color(color.as_ref()),
            description: description.into(),
        }
    }

    /// Normalize color (strip any leading #)
    pub fn normalize_color(color: &str) -> String {
        color.trim_start_matches('#').to_string()
    }

    /// Whether `other` differs in color or description
    ///
    /// GitHub stores colors in lowercase, so colors compare case-insensitively.
    pub fn differs_from(&self, other: &LabelRecord) -> bool {
        !self.color.eq_ignore_ascii_case(&other.color) || self.description != other.description
    }
}

/// A label entry as written in a definition file, before validation
#[derive(Debug, Default, Deserialize)]
struct LabelEntry {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    color: Option<String>,

    #[serde(default)]
    description: Option<String>,
}

impl LabelEntry {
    /// Validate and normalize into a [`LabelRecord`]
    ///
    /// `index` is 1-based and only used for error reporting.
    fn into_record(self, source: &str, index: usize) -> Result<LabelRecord> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(LabelRecord::new(
                name,
                self.color.unwrap_or_default(),
                self.description.unwrap_or_default(),
            )),
            _ => Err(Error::config(format!(
                "Error on {source}. Name not found on `Label #{index}` with color `{}` and description `{}`",
                self.color.as_deref().unwrap_or(""),
                self.description.as_deref().unwrap_or(""),
            ))),
        }
    }
}

/// Supported label file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFileFormat {
    Yaml,
    Json,
}

impl LabelFileFormat {
    /// Detect the format from a file name
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".yaml") || file_name.ends_with(".yml") {
            Some(Self::Yaml)
        } else if file_name.ends_with(".json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// File extension written by `dump`
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// Parse a list document; an empty document yields an empty list
    fn parse_list<T: DeserializeOwned>(self, content: &str) -> Result<Vec<T>> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Option<Vec<T>> = match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        };
        Ok(items.unwrap_or_default())
    }
}

/// List the regular files in `dir`, sorted by name
fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(Error::config(format!(
            "No {} dir found. To solve this issue, first run `ghlabel dump`",
            dir.display()
        )));
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

fn is_remove_file(file_name: &str) -> bool {
    file_name.starts_with(REMOVE_FILE_PREFIX)
}

/// Load the desired labels from every definition file in `dir`
///
/// YAML/YML files are preferred; JSON files are only read when no YAML file
/// exists. Files starting with `_remove` are never treated as definitions.
///
/// # Arguments
/// - `dir`: Labels directory
///
/// # Returns
/// The labels of every selected file in file name order, duplicates merged
///
/// # Errors
/// - If `dir` does not exist
/// - If neither YAML nor JSON files are present
/// - If a file fails to parse or an entry has no name
pub fn load_desired_labels(dir: &Path) -> Result<Vec<LabelRecord>> {
    let file_names = list_file_names(dir)?;
    let candidates: Vec<(&String, LabelFileFormat)> = file_names
        .iter()
        .filter(|name| !is_remove_file(name))
        .filter_map(|name| LabelFileFormat::from_file_name(name).map(|format| (name, format)))
        .collect();

    let yaml_files: Vec<&String> = candidates
        .iter()
        .filter(|(_, format)| *format == LabelFileFormat::Yaml)
        .map(|(name, _)| *name)
        .collect();
    let json_files: Vec<&String> = candidates
        .iter()
        .filter(|(_, format)| *format == LabelFileFormat::Json)
        .map(|(name, _)| *name)
        .collect();

    let (selected, format) = if !yaml_files.is_empty() {
        info!("Found YAML files. Loading labels from YAML config");
        (yaml_files, LabelFileFormat::Yaml)
    } else if !json_files.is_empty() {
        info!("Found JSON files. Loading labels from JSON config");
        (json_files, LabelFileFormat::Json)
    } else {
        return Err(Error::config(format!(
            "No YAML or JSON label files found in {}. To solve this issue, first run `ghlabel dump`",
            dir.display()
        )));
    };

    let mut labels = Vec::new();
    for file_name in selected {
        debug!(file = %file_name, "Loading labels");
        let content = std::fs::read_to_string(dir.join(file_name))?;
        let entries: Vec<LabelEntry> = format
            .parse_list(&content)
            .map_err(|e| Error::config(format!("Failed to parse {file_name}: {e}")))?;
        for (i, entry) in entries.into_iter().enumerate() {
            labels.push(entry.into_record(file_name, i + 1)?);
        }
    }

    Ok(dedupe_labels(labels))
}

/// Load the remove list from the `_remove*` file in `dir`
///
/// A YAML/YML remove file is preferred over a JSON one. When no remove file
/// exists the list is empty.
///
/// # Arguments
/// - `dir`: Labels directory
///
/// # Errors
/// If `dir` does not exist or the remove file fails to parse
pub fn load_remove_list(dir: &Path) -> Result<BTreeSet<String>> {
    let file_names = list_file_names(dir)?;
    let remove_files: Vec<(&String, LabelFileFormat)> = file_names
        .iter()
        .filter(|name| is_remove_file(name))
        .filter_map(|name| LabelFileFormat::from_file_name(name).map(|format| (name, format)))
        .collect();

    let selected = remove_files
        .iter()
        .find(|(_, format)| *format == LabelFileFormat::Yaml)
        .or_else(|| remove_files.first());

    let Some((file_name, format)) = selected else {
        debug!(dir = %dir.display(), "No remove file found");
        return Ok(BTreeSet::new());
    };

    info!(file = %file_name, "Loading labels to remove");
    let content = std::fs::read_to_string(dir.join(file_name.as_str()))?;
    let names: Vec<String> = format
        .parse_list(&content)
        .map_err(|e| Error::config(format!("Failed to parse {file_name}: {e}")))?;
    Ok(names.into_iter().collect())
}

/// Parse the `--add-labels` argument: a JSON list of label objects
///
/// # Errors
/// If the JSON is malformed or an entry has no name
pub fn parse_label_arg(json: &str) -> Result<Vec<LabelRecord>> {
    let entries: Vec<LabelEntry> = LabelFileFormat::Json.parse_list(json)?;
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| entry.into_record("argument label", i + 1))
        .collect()
}

/// Parse the `--remove-labels` argument: comma separated label names
pub fn parse_label_names(csv: &str) -> BTreeSet<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove duplicate names, keeping the position of the first occurrence and
/// the content of the last
pub fn dedupe_labels(labels: Vec<LabelRecord>) -> Vec<LabelRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<LabelRecord> = Vec::with_capacity(labels.len());

    for label in labels {
        if let Some(&index) = positions.get(&label.name) {
            warn!(label = %label.name, "Label defined more than once, using the last definition");
            unique[index] = label;
        } else {
            positions.insert(label.name.clone(), unique.len());
            unique.push(label);
        }
    }

    unique
}

/// Repository Configuration
///
/// Immutable connection settings, built once per run and passed to the
/// client explicitly.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// GitHub access token
    pub token: String,

    /// Repository owner
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// REST API base URL
    pub api_url: Url,

    /// Per-request timeout
    pub timeout: Duration,
}

impl RepoConfig {
    /// Create a configuration for github.com with the default timeout
    ///
    /// # Errors
    /// If any of the values is empty
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_url: Url::parse(DEFAULT_API_URL)
                .map_err(|e| Error::config(format!("Invalid API URL: {e}")))?,
            timeout: DEFAULT_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Use a different API base URL
    ///
    /// # Errors
    /// If `api_url` is not a valid URL
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        self.api_url = Url::parse(api_url)
            .map_err(|e| Error::config(format!("Invalid API URL `{api_url}`: {e}")))?;
        Ok(self)
    }

    /// Use a different per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::config("Access token cannot be empty"));
        }
        if self.owner.trim().is_empty() {
            return Err(Error::config("Repository owner cannot be empty"));
        }
        if self.repo.trim().is_empty() {
            return Err(Error::config("Repository name cannot be empty"));
        }
        Ok(())
    }
}

/// Credentials given on the command line
#[derive(Debug, Clone, Default)]
pub struct CredentialArgs {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
}

/// Values read from a `.env` file
#[derive(Debug, Clone, Default)]
pub struct DotEnv {
    values: HashMap<String, String>,
}

impl DotEnv {
    /// Read a `.env` file without touching the process environment
    ///
    /// A missing file yields an empty set of values.
    ///
    /// # Errors
    /// If the file exists but cannot be parsed
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;

        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item
                .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
            values.insert(key, value);
        }

        Ok(Self { values })
    }

    /// Default location: `.env` in the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from(".env")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for DotEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Resolve one setting: argument, then environment, then `.env`
fn resolve_value<F>(arg: Option<String>, key: &str, env: &F, dotenv: &DotEnv) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    arg.filter(|value| !value.is_empty())
        .or_else(|| env(key).filter(|value| !value.is_empty()))
        .or_else(|| {
            dotenv
                .get(key)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
}

fn require_value<F>(arg: Option<String>, key: &str, env: &F, dotenv: &DotEnv) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    resolve_value(arg, key, env, dotenv).ok_or_else(|| {
        Error::config(format!(
            "{key} is not set. Pass it as an argument, set the environment variable, or add it to .env"
        ))
    })
}

/// Build the repository configuration from arguments, the environment, and
/// a `.env` file, in that order of priority
///
/// # Arguments
/// - `args`: Values given on the command line
/// - `env`: Environment lookup
/// - `dotenv`: Values read from the `.env` file
///
/// # Errors
/// If the token, owner, or repository name cannot be found in any source
pub fn resolve_repo_config<F>(args: CredentialArgs, env: F, dotenv: &DotEnv) -> Result<RepoConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let token = require_value(args.token, TOKEN_ENV, &env, dotenv)?;
    let owner = require_value(args.owner, OWNER_ENV, &env, dotenv)?;
    let repo = require_value(args.repo, REPO_ENV, &env, dotenv)?;

    let config = RepoConfig::new(token, owner, repo)?;
    match resolve_value(None, API_URL_ENV, &env, dotenv) {
        Some(api_url) => config.with_api_url(&api_url),
        None => Ok(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_normalize_color_strips_hash() {
        assert_eq!(LabelRecord::normalize_color("#AABBCC"), "AABBCC");
        assert_eq!(LabelRecord::normalize_color("aabbcc"), "aabbcc");
        assert_eq!(LabelRecord::new("bug", "#ff0000", "").color, "ff0000");
    }

    #[test]
    fn test_differs_from_ignores_color_case() {
        let config = LabelRecord::new("bug", "#AABBCC", "Broken");
        let remote = LabelRecord::new("bug", "aabbcc", "Broken");
        assert!(!config.differs_from(&remote));

        let recolored = LabelRecord::new("bug", "00ff00", "Broken");
        assert!(config.differs_from(&recolored));

        let redescribed = LabelRecord::new("bug", "aabbcc", "Something else");
        assert!(config.differs_from(&redescribed));
    }

    #[test]
    fn test_load_yaml_labels_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "labels.yaml",
            "- name: bug\n  color: \"#AABBCC\"\n  description: Broken\n- name: chore\n",
        );

        let labels = load_desired_labels(dir.path()).unwrap();
        assert_eq!(
            labels,
            vec![
                LabelRecord::new("bug", "AABBCC", "Broken"),
                LabelRecord::new("chore", "", ""),
            ]
        );
    }

    #[test]
    fn test_yaml_preferred_over_json() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yml", "- name: from-yaml\n  color: ff0000\n");
        write(dir.path(), "b.json", r##"[{"name":"from-json","color":"#00ff00"}]"##);

        let labels = load_desired_labels(dir.path()).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "from-yaml");
    }

    #[test]
    fn test_json_used_when_no_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "labels.json", r##"[{"name":"bug","color":"#00ff00"}]"##);
        write(dir.path(), "_remove_labels.yaml", "- wontfix\n");

        let labels = load_desired_labels(dir.path()).unwrap();
        assert_eq!(labels, vec![LabelRecord::new("bug", "00ff00", "")]);
    }

    #[test]
    fn test_remove_file_is_not_a_definition() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_remove_labels.yaml", "- wontfix\n");

        let err = load_desired_labels(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No YAML or JSON label files found"));
    }

    #[test]
    fn test_missing_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("labels");

        let err = load_desired_labels(&missing).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("dir found"));
    }

    #[test]
    fn test_missing_name_reports_file_and_index() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "type_labels.yaml",
            "- name: ok\n- color: \"#ff0000\"\n  description: nameless\n",
        );

        let err = load_desired_labels(dir.path()).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::Config(_)));
        assert!(message.contains("type_labels.yaml"));
        assert!(message.contains("Label #2"));
        assert!(message.contains("nameless"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "labels.json", r##"[{"name":"","color":"#ff0000"}]"##);
        assert!(load_desired_labels(dir.path()).is_err());
    }

    #[test]
    fn test_empty_file_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", "");
        write(dir.path(), "b.yaml", "- name: bug\n");

        let labels = load_desired_labels(dir.path()).unwrap();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_duplicate_definitions_last_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.yaml", "- name: bug\n  color: ff0000\n- name: docs\n");
        write(dir.path(), "b.yaml", "- name: bug\n  color: 00ff00\n");

        let labels = load_desired_labels(dir.path()).unwrap();
        assert_eq!(
            labels,
            vec![
                LabelRecord::new("bug", "00ff00", ""),
                LabelRecord::new("docs", "", ""),
            ]
        );
    }

    #[test]
    fn test_load_remove_list_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_remove_labels.yaml", "- bug\n- wontfix\n- bug\n");

        let names = load_remove_list(dir.path()).unwrap();
        assert_eq!(
            names,
            BTreeSet::from(["bug".to_string(), "wontfix".to_string()])
        );
    }

    #[test]
    fn test_malformed_label_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default_labels.yaml", "- name: bug\n");
        write(dir.path(), "type_labels.yaml", "- name: ok\n- just-a-string\n");

        let err = load_desired_labels(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("type_labels.yaml"));
    }

    #[test]
    fn test_non_list_label_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "labels.json", r#"{"name": "bug"}"#);

        let err = load_desired_labels(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("labels.json"));
    }

    #[test]
    fn test_malformed_remove_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_remove_labels.yaml", "- name: bug\n");

        let err = load_remove_list(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("_remove_labels.yaml"));
    }

    #[test]
    fn test_load_remove_list_json() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "_remove.json", r#"["question"]"#);

        let names = load_remove_list(dir.path()).unwrap();
        assert!(names.contains("question"));
    }

    #[test]
    fn test_missing_remove_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "labels.yaml", "- name: bug\n");

        assert!(load_remove_list(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_label_arg() {
        let labels =
            parse_label_arg(r##"[{"name":"urgent","color":"#FF0000","description":"Now"}]"##)
                .unwrap();
        assert_eq!(labels, vec![LabelRecord::new("urgent", "FF0000", "Now")]);

        let err = parse_label_arg(r##"[{"color":"#FF0000"}]"##).unwrap_err();
        assert!(err.to_string().contains("argument label"));

        assert!(parse_label_arg("not json").is_err());
    }

    #[test]
    fn test_parse_label_names() {
        let names = parse_label_names(" bug, wontfix ,,question");
        assert_eq!(
            names,
            BTreeSet::from([
                "bug".to_string(),
                "question".to_string(),
                "wontfix".to_string()
            ])
        );
    }

    #[test]
    fn test_repo_config_rejects_empty_values() {
        assert!(RepoConfig::new("", "owner", "repo").is_err());
        assert!(RepoConfig::new("token", " ", "repo").is_err());
        assert!(RepoConfig::new("token", "owner", "").is_err());

        let config = RepoConfig::new("token", "owner", "repo").unwrap();
        assert_eq!(config.slug(), "owner/repo");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.api_url.as_str(), "https://api.github.com/");
    }

    #[test]
    fn test_resolve_prefers_args_then_env_then_dotenv() {
        let dotenv: DotEnv = [
            (TOKEN_ENV.to_string(), "dotenv-token".to_string()),
            (OWNER_ENV.to_string(), "dotenv-owner".to_string()),
            (REPO_ENV.to_string(), "dotenv-repo".to_string()),
        ]
        .into_iter()
        .collect();
        let env = |key: &str| (key == OWNER_ENV).then(|| "env-owner".to_string());
        let args = CredentialArgs {
            token: Some("arg-token".to_string()),
            ..Default::default()
        };

        let config = resolve_repo_config(args, env, &dotenv).unwrap();
        assert_eq!(config.token, "arg-token");
        assert_eq!(config.owner, "env-owner");
        assert_eq!(config.repo, "dotenv-repo");
    }

    #[test]
    fn test_resolve_missing_credential_is_fatal() {
        let err = resolve_repo_config(CredentialArgs::default(), |_| None, &DotEnv::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn test_resolve_api_url_override() {
        let env = |key: &str| match key {
            API_URL_ENV => Some("http://127.0.0.1:8080".to_string()),
            _ => Some("value".to_string()),
        };
        let config = resolve_repo_config(CredentialArgs::default(), env, &DotEnv::default())
            .unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_dotenv_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GITHUB_TOKEN=from-file\nGITHUB_REPO_OWNER=someone\n").unwrap();

        let dotenv = DotEnv::load(&path).unwrap();
        assert_eq!(dotenv.get(TOKEN_ENV), Some("from-file"));
        assert_eq!(dotenv.get(REPO_ENV), None);

        let missing = DotEnv::load(&dir.path().join("absent.env")).unwrap();
        assert_eq!(missing.get(TOKEN_ENV), None);
    }
}
