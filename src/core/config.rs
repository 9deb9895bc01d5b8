use crate::counter::CounterPolicy;
use crate::defaults;
use crate::error::{Error, Result};
use crate::utils::{io, parser};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "renumber.json";

// ============================================================================
// JSON Parsing Utilities (internal)
// ============================================================================

/// Parse JSON string into typed value, attributing errors to `path`.
pub(crate) fn from_str<T: DeserializeOwned>(s: &str, path: &Path) -> Result<T> {
    serde_json::from_str(s).map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}

/// Serialize value to pretty-printed JSON string.
pub(crate) fn to_string_pretty<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize json".to_string())))
}

// ============================================================================
// Config Types
// ============================================================================

/// Root structure of renumber.json.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenumberConfig {
    /// Data files in ID assignment order, relative to the config directory.
    pub files: Vec<String>,

    #[serde(default)]
    pub policy: CounterPolicy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<CheckpointConfig>,
}

/// Where the checkpoint is taken and where it is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointConfig {
    /// File whose first ID becomes the checkpoint. Must be in `files`.
    pub file: String,

    /// Source file receiving the constant, relative to the config directory.
    pub target: String,

    #[serde(default = "default_constant")]
    pub constant: String,
}

fn default_constant() -> String {
    defaults::CHECKPOINT_CONSTANT.to_string()
}

/// A config paired with the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    pub config: RenumberConfig,
}

impl LoadedConfig {
    /// Wrap an in-memory config rooted at `base_dir`.
    pub fn in_dir(base_dir: impl Into<PathBuf>, config: RenumberConfig) -> Result<Self> {
        let base_dir = base_dir.into();
        config.validate()?;
        Ok(Self {
            path: base_dir.join(CONFIG_FILE_NAME),
            base_dir,
            config,
        })
    }

    /// Data file paths in processing order.
    pub fn data_paths(&self) -> Vec<PathBuf> {
        self.config
            .files
            .iter()
            .map(|file| parser::resolve_path(&self.base_dir, file))
            .collect()
    }

    pub fn checkpoint_target(&self) -> Option<PathBuf> {
        self.config
            .checkpoint
            .as_ref()
            .map(|checkpoint| parser::resolve_path(&self.base_dir, &checkpoint.target))
    }

    /// Index of the checkpoint file within `files`.
    pub fn checkpoint_index(&self) -> Option<usize> {
        let checkpoint = self.config.checkpoint.as_ref()?;
        self.config.files.iter().position(|f| f == &checkpoint.file)
    }
}

impl RenumberConfig {
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(Error::config_missing_key("files", None)
                .with_hint("List the data files in the order IDs should be assigned"));
        }

        if let Some(file) = self.files.iter().find(|f| f.trim().is_empty()) {
            return Err(Error::config_invalid_value(
                "files",
                Some(file.clone()),
                "file names must not be empty",
            ));
        }

        let duplicates = parser::duplicates(&self.files);
        if !duplicates.is_empty() {
            return Err(Error::config_invalid_value(
                "files",
                Some(duplicates.join(", ")),
                "each data file may appear only once",
            ));
        }

        self.policy.validate()?;

        if let Some(checkpoint) = &self.checkpoint {
            if !self.files.contains(&checkpoint.file) {
                return Err(Error::config_invalid_value(
                    "checkpoint.file",
                    Some(checkpoint.file.clone()),
                    "checkpoint file must be one of the configured files",
                ));
            }
            if checkpoint.target.trim().is_empty() {
                return Err(Error::config_missing_key("checkpoint.target", None));
            }
            validate_constant_name(&checkpoint.constant)?;
        }

        Ok(())
    }
}

/// Constant names are plain identifiers: a letter or `_`, then letters,
/// digits or `_`.
pub fn validate_constant_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(Error::config_invalid_value(
            "checkpoint.constant",
            Some(name.to_string()),
            "constant must be an identifier (letters, digits, underscores)",
        ))
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Resolve the config path: an explicit path wins, otherwise renumber.json in
/// the current directory.
pub fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(PathBuf::from(shellexpand::tilde(path).to_string()));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("get current dir".to_string())))?;
    Ok(cwd.join(CONFIG_FILE_NAME))
}

/// Load and validate a config file.
pub fn load(path: &Path) -> Result<LoadedConfig> {
    if !path.is_file() {
        return Err(Error::config_not_found(path.display().to_string()));
    }

    let content = io::read_file(path, "read config")?;
    let config: RenumberConfig = from_str(&content, path)?;
    config.validate()?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    log_status!("config", "Loaded {} ({} files)", path.display(), config.files.len());

    Ok(LoadedConfig {
        path: path.to_path_buf(),
        base_dir,
        config,
    })
}

/// Write a config file atomically.
pub fn save(path: &Path, config: &RenumberConfig) -> Result<()> {
    config.validate()?;
    let mut content = to_string_pretty(config)?;
    content.push('\n');
    io::write_file_atomic(path, &content, "write config")
}
