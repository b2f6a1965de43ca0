//! Extraction configuration, read from YAML.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    category::CategoryTable,
    columns::{ColumnRule, ColumnRules},
    header::DEFAULT_ANCHORS,
    source::PageRange,
};

/// Configuration used when no configuration file is given.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../data/default_config.yaml");

/// Problems with configuration content that parsed as valid YAML.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("lattice pages {lattice} are not within pages {pages}")]
    LatticeOutsidePages { lattice: PageRange, pages: PageRange },
    #[error("header_anchors must not be empty")]
    NoHeaderAnchors,
    #[error("column rule {index} has an empty pattern")]
    EmptyPattern { index: usize },
    #[error("{0}")]
    ShadowedRule(String),
    #[error("category key {0:?} is not an upper case letter")]
    InvalidCategoryLetter(char),
}

/// Prepared configuration of an extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfig {
    /// Pages searched by the stream strategy.
    pub pages: PageRange,
    /// Pages searched by the lattice strategy, which is skipped if [None].
    pub lattice_pages: Option<PageRange>,
    /// Lower case terms identifying a header row.
    pub header_anchors: Vec<String>,
    pub column_rules: ColumnRules,
    pub categories: CategoryTable,
}

impl ExtractConfig {
    /// Parses and validates configuration from YAML text. Omitted fields take their default
    /// values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: YamlConfig =
            serde_yaml_ng::from_str(yaml).context("parsing configuration YAML")?;
        Ok(config.prepare()?)
    }

    /// Loads configuration from the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration file {:?}", path))?;
        Self::from_yaml_str(&yaml)
            .with_context(|| format!("loading configuration file {:?}", path))
    }

    /// Loads configuration from `path` if given, otherwise the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::from_yaml_str(DEFAULT_CONFIG_YAML)
                .context("bug: built-in configuration is invalid"),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            lattice_pages: default_lattice_pages(),
            header_anchors: default_header_anchors(),
            column_rules: ColumnRules::default(),
            categories: CategoryTable::default(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    #[serde(default = "default_pages")]
    pages: PageRange,
    #[serde(default = "default_lattice_pages")]
    lattice_pages: Option<PageRange>,
    #[serde(default = "default_header_anchors")]
    header_anchors: Vec<String>,
    #[serde(default)]
    column_rules: Option<Vec<ColumnRule>>,
    #[serde(default)]
    categories: Option<BTreeMap<char, String>>,
}

impl YamlConfig {
    fn prepare(self) -> std::result::Result<ExtractConfig, ConfigError> {
        if let Some(lattice) = self.lattice_pages {
            if !self.pages.contains_range(&lattice) {
                return Err(ConfigError::LatticeOutsidePages {
                    lattice,
                    pages: self.pages,
                });
            }
        }

        let header_anchors: Vec<String> = self
            .header_anchors
            .iter()
            .map(|anchor| anchor.trim().to_lowercase())
            .filter(|anchor| !anchor.is_empty())
            .collect();
        if header_anchors.is_empty() {
            return Err(ConfigError::NoHeaderAnchors);
        }

        let column_rules = match self.column_rules {
            Some(rules) => prepare_rules(rules)?,
            None => ColumnRules::default(),
        };

        let categories = match self.categories {
            Some(categories) => {
                if let Some(letter) = categories.keys().find(|c| !c.is_ascii_uppercase()) {
                    return Err(ConfigError::InvalidCategoryLetter(*letter));
                }
                CategoryTable::new(categories)
            }
            None => CategoryTable::default(),
        };

        Ok(ExtractConfig {
            pages: self.pages,
            lattice_pages: self.lattice_pages,
            header_anchors,
            column_rules,
            categories,
        })
    }
}

fn prepare_rules(rules: Vec<ColumnRule>) -> std::result::Result<ColumnRules, ConfigError> {
    let rules = rules
        .into_iter()
        .enumerate()
        .map(|(index, rule)| {
            let pattern = rule.pattern.trim().to_lowercase();
            if pattern.is_empty() {
                Err(ConfigError::EmptyPattern { index })
            } else {
                Ok(ColumnRule {
                    pattern,
                    key: rule.key,
                })
            }
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(ColumnRules)?;

    match rules.find_shadowed() {
        Some(description) => Err(ConfigError::ShadowedRule(description)),
        None => Ok(rules),
    }
}

fn default_pages() -> PageRange {
    PageRange::new(29, 202).expect("bug: default page range is invalid")
}

fn default_lattice_pages() -> Option<PageRange> {
    Some(PageRange::new(30, 37).expect("bug: default lattice page range is invalid"))
}

fn default_header_anchors() -> Vec<String> {
    DEFAULT_ANCHORS.iter().map(|anchor| anchor.to_string()).collect()
}
