//! Site configuration module.
//!
//! Turns the raw `site.json` mapping into an immutable, strongly typed
//! [`SiteConfig`]. Section sources are loaded eagerly while parsing: a
//! `singular` section reads its one file, a `plural` section reads every file
//! in its directory. A config that parses is therefore a config whose content
//! is already in memory.
//!
//! ## Config File
//!
//! ```json
//! {
//!   "settings": { "include_drafts": false },
//!   "base_url": "https://example.com",
//!   "website": {
//!     "title": "My Site",
//!     "description": "Notes and projects",
//!     "image": "https://example.com/cover.png",
//!     "locale": "en_US"
//!   },
//!   "sections": {
//!     "home": {
//!       "title": "Home",
//!       "description": "Landing page",
//!       "resource_path": "/index",
//!       "read_from": { "type": "singular", "path": "content/index.md" }
//!     },
//!     "blog": {
//!       "title": "Blog",
//!       "description": "Posts",
//!       "resource_path": "/blog",
//!       "read_from": { "type": "plural", "path": "content/blog" }
//!     }
//!   }
//! }
//! ```
//!
//! `read_from.path` is resolved against the directory holding the config file.
//! Sections keep the order they have in the file; that order is the order of
//! the navigation menu.
//!
//! ## Error Policy
//!
//! Top-level keys fail fast. Within one section every field problem is
//! collected and reported together as [`ConfigError::InvalidSection`]; across
//! sections the first invalid one stops parsing. Unknown keys are rejected at
//! every level, so a misspelled field is an error rather than a silent default.

use crate::files::{self, FileData, FileError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Days added to a post's publication time to get its Open Graph expiration.
pub const DEFAULT_EXPIRATION_DAYS: u32 = 731;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("section `{name}` is invalid: {}", .problems.join("; "))]
    InvalidSection { name: String, problems: Vec<String> },
    #[error("config must define at least one section")]
    NoSections,
    #[error("section `{section}`: unknown read_from type `{value}` (expected \"singular\" or \"plural\")")]
    UnknownReadFromType { section: String, value: String },
    #[error("section `{section}`: {source}")]
    FileRead {
        section: String,
        #[source]
        source: FileError,
    },
}

/// Fully validated site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Absolute site root, e.g. `https://example.com`. Empty for root-relative URLs.
    pub base_url: String,
    pub website: WebsiteInfo,
    pub settings: Settings,
    pub sections: Sections,
}

/// Global build switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Render posts whose front matter says `draft: true`.
    pub include_drafts: bool,
    /// Offset from publication time to Open Graph expiration time.
    pub expiration_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_drafts: false,
            expiration_days: DEFAULT_EXPIRATION_DAYS,
        }
    }
}

/// Site-wide metadata used for page-level Open Graph tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteInfo {
    pub title: String,
    pub description: String,
    pub image: String,
    pub locale: String,
}

/// A named content group.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub description: String,
    /// Site path of the section index, e.g. `/blog`.
    pub resource_path: String,
    pub read_from: ReadFrom,
}

/// Where a section's content comes from, already loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadFrom {
    /// One file, e.g. the home page body.
    Singular { path: PathBuf, file: FileData },
    /// Every regular file directly inside a directory.
    Plural { path: PathBuf, files: Vec<FileData> },
}

impl ReadFrom {
    pub fn kind(&self) -> &'static str {
        match self {
            ReadFrom::Singular { .. } => "singular",
            ReadFrom::Plural { .. } => "plural",
        }
    }
}

/// Sections keyed by name, in config-file order. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Sections(Vec<(String, Section)>);

impl Sections {
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.0.iter().map(|(key, s)| (key.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Section)> for Sections {
    fn from_iter<I: IntoIterator<Item = (String, Section)>>(iter: I) -> Self {
        let mut sections = Sections::default();
        for (name, section) in iter {
            match sections.0.iter_mut().find(|(key, _)| *key == name) {
                Some(slot) => slot.1 = section,
                None => sections.0.push((name, section)),
            }
        }
        sections
    }
}

// =============================================================================
// Loading and parsing
// =============================================================================

/// Read and parse a config file. Section paths resolve against its directory.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content)?;
    let root = path.parent().unwrap_or_else(|| Path::new(""));
    let config = parse_site_config(&value, root)?;
    tracing::info!(
        config = %path.display(),
        sections = config.sections.len(),
        "loaded site config"
    );
    Ok(config)
}

/// `site.json` as written. Presence and shape are checked by serde; which
/// fields are required is decided afterwards so problems can be collected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSiteConfig {
    settings: Option<RawSettings>,
    base_url: Option<String>,
    website: Option<RawWebsite>,
    // Older configs keep site info at the top level.
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    locale: Option<String>,
    sections: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    include_drafts: Option<bool>,
    expiration_days: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWebsite {
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSection {
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "url")]
    resource_path: Option<String>,
    read_from: Option<RawReadFrom>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReadFrom {
    #[serde(rename = "type")]
    kind: Option<String>,
    path: Option<String>,
}

/// Validate a raw config tree and load every section's content.
///
/// `root` is the directory relative `read_from.path` values are joined to.
pub fn parse_site_config(value: &Value, root: &Path) -> Result<SiteConfig, ConfigError> {
    if !value.is_object() {
        return Err(ConfigError::Validation("config must be a JSON object".into()));
    }
    let raw = RawSiteConfig::deserialize(value).map_err(|err| ConfigError::Validation(err.to_string()))?;

    let settings = parse_settings(raw.settings)?;
    let website = parse_website(match raw.website {
        Some(website) => website,
        None => RawWebsite {
            title: raw.title,
            description: raw.description,
            image: raw.image,
            locale: raw.locale,
        },
    })?;

    let raw_sections = raw
        .sections
        .ok_or_else(|| ConfigError::Validation("missing `sections`".into()))?;
    if raw_sections.is_empty() {
        return Err(ConfigError::NoSections);
    }

    let mut sections = Vec::with_capacity(raw_sections.len());
    for (name, raw) in &raw_sections {
        let section = parse_section(name, raw, root)?;
        sections.push((name.clone(), section));
    }

    Ok(SiteConfig {
        base_url: raw.base_url.unwrap_or_default(),
        website,
        settings,
        sections: sections.into_iter().collect(),
    })
}

fn parse_settings(raw: Option<RawSettings>) -> Result<Settings, ConfigError> {
    let raw = raw.ok_or_else(|| ConfigError::Validation("missing `settings`".into()))?;
    let include_drafts = raw.include_drafts.ok_or_else(|| {
        ConfigError::Validation("missing `settings.include_drafts`".into())
    })?;

    Ok(Settings {
        include_drafts,
        expiration_days: raw.expiration_days.unwrap_or(DEFAULT_EXPIRATION_DAYS),
    })
}

fn parse_website(raw: RawWebsite) -> Result<WebsiteInfo, ConfigError> {
    let mut problems = Vec::new();
    let title = required(raw.title, "title", &mut problems);
    let description = required(raw.description, "description", &mut problems);
    let image = required(raw.image, "image", &mut problems);
    let locale = required(raw.locale, "locale", &mut problems);

    if !problems.is_empty() {
        return Err(ConfigError::Validation(format!(
            "website info: {}",
            problems.join("; ")
        )));
    }

    Ok(WebsiteInfo {
        title,
        description,
        image,
        locale,
    })
}

fn parse_section(name: &str, raw: &Value, root: &Path) -> Result<Section, ConfigError> {
    let invalid = |problems| ConfigError::InvalidSection {
        name: name.to_string(),
        problems,
    };
    let raw = RawSection::deserialize(raw).map_err(|err| invalid(vec![err.to_string()]))?;

    let mut problems = Vec::new();
    let title = required(raw.title, "title", &mut problems);
    let description = required(raw.description, "description", &mut problems);
    let resource_path = required(raw.resource_path, "resource_path` (or `url", &mut problems);
    let (read_type, read_path) = match raw.read_from {
        Some(read_from) => (
            required(read_from.kind, "read_from.type", &mut problems),
            required(read_from.path, "read_from.path", &mut problems),
        ),
        None => {
            problems.push("missing `read_from`".to_string());
            (String::new(), String::new())
        }
    };

    if !problems.is_empty() {
        return Err(invalid(problems));
    }

    let path = root.join(&read_path);
    let file_err = |source| ConfigError::FileRead {
        section: name.to_string(),
        source,
    };
    let read_from = match read_type.as_str() {
        "singular" => {
            let file = files::read_file(&path).map_err(file_err)?;
            ReadFrom::Singular { path, file }
        }
        "plural" => {
            let files = files::read_dir_files(&path).map_err(file_err)?;
            ReadFrom::Plural { path, files }
        }
        other => {
            return Err(ConfigError::UnknownReadFromType {
                section: name.to_string(),
                value: other.to_string(),
            });
        }
    };

    tracing::debug!(section = name, kind = read_from.kind(), "loaded section source");

    Ok(Section {
        title,
        description,
        resource_path,
        read_from,
    })
}

/// Unwrap a required field, recording a problem instead of failing.
fn required(value: Option<String>, key: &str, problems: &mut Vec<String>) -> String {
    value.unwrap_or_else(|| {
        problems.push(format!("missing `{key}`"));
        String::new()
    })
}

/// A complete starter `site.json`, printed by the `gen-config` command.
pub fn stock_config_json() -> &'static str {
    r#"{
  "settings": {
    "include_drafts": false,
    "expiration_days": 731
  },
  "base_url": "https://example.com",
  "website": {
    "title": "My Site",
    "description": "Notes, projects and the occasional essay",
    "image": "https://example.com/cover.png",
    "locale": "en_US"
  },
  "sections": {
    "home": {
      "title": "Home",
      "description": "Landing page",
      "resource_path": "/index",
      "read_from": { "type": "singular", "path": "content/index.md" }
    },
    "blog": {
      "title": "Blog",
      "description": "All posts",
      "resource_path": "/blog",
      "read_from": { "type": "plural", "path": "content/blog" }
    }
  }
}
"#
}
