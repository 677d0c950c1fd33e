use crate::error::CatalogError;
use crate::maintenance_patterns::MaintenancePattern;
use serde::Deserialize;
use shared_types::PatternRule;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct PatternFile {
    #[serde(default)]
    patterns: Vec<PatternRule>,
}

/// Reads every pattern file in `dir`, in file-name order, and concatenates
/// their rules.
///
/// `*.toml` files hold a `[[patterns]]` array; `*.json`, `*.yml` and
/// `*.yaml` files a top-level sequence. Other files are ignored.
pub fn load_rules(dir: &Path) -> Result<Vec<PatternRule>, CatalogError> {
    let io_error = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && pattern_format(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();

    let mut rules = Vec::new();
    for path in files {
        let mut file_rules = read_pattern_file(&path)?;
        tracing::debug!("Loaded {} pattern(s) from {:?}", file_rules.len(), path);
        rules.append(&mut file_rules);
    }

    Ok(rules)
}

#[derive(Debug, Clone, Copy)]
enum PatternFormat {
    Toml,
    Json,
    Yaml,
}

fn pattern_format(path: &Path) -> Option<PatternFormat> {
    match path.extension()?.to_str()? {
        "toml" => Some(PatternFormat::Toml),
        "json" => Some(PatternFormat::Json),
        "yml" | "yaml" => Some(PatternFormat::Yaml),
        _ => None,
    }
}

fn read_pattern_file(path: &Path) -> Result<Vec<PatternRule>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let malformed = |message: String| CatalogError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    match pattern_format(path) {
        Some(PatternFormat::Json) => {
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))
        }
        Some(PatternFormat::Yaml) => {
            serde_yaml::from_str(&content).map_err(|e| malformed(e.to_string()))
        }
        _ => toml::from_str::<PatternFile>(&content)
            .map(|file| file.patterns)
            .map_err(|e| malformed(e.to_string())),
    }
}

/// The compiled, read-only set of partner patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: Vec<MaintenancePattern>,
}

impl PatternCatalog {
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let catalog = Self::from_rules(load_rules(dir)?)?;
        tracing::info!(
            "Loaded {} notification pattern(s) from {:?}",
            catalog.len(),
            dir
        );
        Ok(catalog)
    }

    pub fn from_rules(rules: Vec<PatternRule>) -> Result<Self, CatalogError> {
        let patterns = rules
            .into_iter()
            .map(MaintenancePattern::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaintenancePattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
