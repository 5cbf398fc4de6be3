use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::filter::FilterCriterion;
use crate::schema::{OutputSchema, SchemaVariant};

pub const LOCAL_CONFIG_FILE: &str = "kontent-csv.toml";
pub const DEFAULT_BASE_URL: &str = "https://deliver.kontent.ai";

/// Everything one export run needs. Loaded once at startup and passed down.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub project_id: String,
    pub base_url: String,
    pub language: String,
    pub content_type: String,
    pub page_size: u32,
    pub output: PathBuf,
    pub variant: SchemaVariant,
    pub filter: FilterCriterion,
    pub include_elements_with_length: Vec<String>,
    pub include_elements: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "global".to_string(),
            content_type: "product".to_string(),
            page_size: 500,
            output: PathBuf::from("products.csv"),
            variant: SchemaVariant::Basic,
            filter: FilterCriterion::default(),
            include_elements_with_length: Vec::new(),
            include_elements: Vec::new(),
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub project_id: Option<String>,
    pub output: Option<PathBuf>,
    pub max_chars: Option<usize>,
    pub variant: Option<SchemaVariant>,
}

impl ExportConfig {
    /// Defaults, then the first config file found, then `KONTENT_*` environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match discover_config_file() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = non_empty("KONTENT_PROJECT_ID") { self.project_id = v; }
        if let Some(v) = non_empty("KONTENT_BASE_URL") { self.base_url = v; }
        if let Some(v) = non_empty("KONTENT_LANGUAGE") { self.language = v; }
    }

    pub fn apply_overrides(&mut self, o: Overrides) {
        if let Some(v) = o.project_id { self.project_id = v; }
        if let Some(v) = o.output { self.output = v; }
        if let Some(v) = o.max_chars { self.filter.max_chars = v; }
        if let Some(v) = o.variant { self.variant = v; }
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            bail!("project_id is not set (config file, KONTENT_PROJECT_ID or --project-id)");
        }
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        Url::parse(&self.base_url).with_context(|| format!("invalid base_url: {}", self.base_url))?;
        if self.language.trim().is_empty() || self.content_type.trim().is_empty() {
            bail!("language and content_type must not be empty");
        }
        if self.filter.element.trim().is_empty() {
            bail!("filter.element must not be empty");
        }
        self.schema()?;
        Ok(())
    }

    pub fn schema(&self) -> Result<OutputSchema> {
        OutputSchema::build(self.variant, &self.include_elements_with_length, &self.include_elements)
    }

    /// Element codenames to request: filter element first, then exported ones, without repeats.
    pub fn requested_elements(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let all = std::iter::once(&self.filter.element)
            .chain(&self.include_elements_with_length)
            .chain(&self.include_elements);
        for el in all {
            if !out.contains(el) {
                out.push(el.clone());
            }
        }
        out
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    let global = ProjectDirs::from("ai", "kontent", "kontent-csv")?.config_dir().join("config.toml");
    global.is_file().then_some(global)
}
