use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::{Error, Result};

/// Name of the optional per-corpus configuration file.
pub const CONFIG_FILE_NAME: &str = "notemap.toml";

/// Which paths a tool skips while enumerating the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanProfile {
    /// Path segments (directory or file names) excluded anywhere in the path.
    pub excluded_segments: Vec<String>,
    /// Exact file names excluded, usually the generated documents themselves.
    pub excluded_filenames: Vec<String>,
}

impl Default for ScanProfile {
    fn default() -> Self {
        Self {
            excluded_segments: vec![".git".into(), "node_modules".into()],
            excluded_filenames: Vec::new(),
        }
    }
}

impl ScanProfile {
    pub fn graph() -> Self {
        Self {
            excluded_segments: vec![".git".into(), "node_modules".into(), "templates".into()],
            excluded_filenames: vec![
                "README.md".into(),
                "KNOWLEDGE_MAP.md".into(),
                "TAG_INDEX.md".into(),
                "GRAPH_VIEW.md".into(),
            ],
        }
    }

    pub fn tags() -> Self {
        Self {
            excluded_segments: vec![".git".into(), "node_modules".into(), "sample".into()],
            excluded_filenames: vec![
                "README.md".into(),
                "KNOWLEDGE_MAP.md".into(),
                "TAG_INDEX.md".into(),
            ],
        }
    }

    pub fn links() -> Self {
        Self::default()
    }

    /// True when any component of `rel` is an excluded segment.
    pub fn excludes_segment(&self, rel: &Path) -> bool {
        rel.components().any(|c| {
            let Component::Normal(part) = c else {
                return false;
            };
            let s = part.to_string_lossy();
            self.excluded_segments.iter().any(|d| d == &s)
        })
    }

    pub fn excludes_filename(&self, rel: &Path) -> bool {
        let Some(name) = rel.file_name().map(|s| s.to_string_lossy()) else {
            return false;
        };
        self.excluded_filenames.iter().any(|f| f == &name)
    }

    pub fn is_excluded(&self, rel: &Path) -> bool {
        self.excludes_segment(rel) || self.excludes_filename(rel)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub graph: ScanProfile,
    pub tags: ScanProfile,
    pub links: ScanProfile,
    /// Graph document path, relative to the corpus root.
    pub graph_output: PathBuf,
    /// Tag index document path, relative to the corpus root.
    pub tag_index_output: PathBuf,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            graph: ScanProfile::graph(),
            tags: ScanProfile::tags(),
            links: ScanProfile::links(),
            graph_output: PathBuf::from("GRAPH_VIEW.md"),
            tag_index_output: PathBuf::from("TAG_INDEX.md"),
        }
    }
}

impl NotesConfig {
    pub fn from_toml_str(input: &str, path: &Path) -> Result<Self> {
        toml::from_str(input).map_err(|err| Error::ConfigToml {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Reads an explicitly named config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse_file(&text, path)
    }

    /// Reads `notemap.toml` from `root`, falling back to defaults when the
    /// file does not exist.
    pub fn load_for_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse_file(&text, &path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config not found; using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(Error::io(&path, err)),
        }
    }

    fn parse_file(text: &str, path: &Path) -> Result<Self> {
        let cfg = Self::from_toml_str(text, path)?;
        info!(path = %path.display(), "config loaded");
        Ok(cfg)
    }
}
