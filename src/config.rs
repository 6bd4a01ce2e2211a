//! Composer configuration files
//!
//! A TOML file that points the renderer at a template directory, chooses how
//! unknown block names are handled and declares static view-models.
//!
//! ```toml
//! [templates]
//! directory = "templates"
//! extension = "tmpl"
//!
//! [compose]
//! missing_block = "placeholder"
//!
//! [blocks.header]
//! title = "Welcome"
//!
//! [blocks.nav]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::compose::MissingBlockPolicy;
use crate::registry::{StaticViewModel, ViewModel};
use crate::RenderConfig;

/// Errors that can occur when loading or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Parsed configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// Template directory, relative paths resolved against the config file
    pub template_dir: Option<PathBuf>,
    /// Extension appended to template locators
    pub template_extension: Option<String>,
    /// Policy for unregistered block names
    pub missing_block: Option<MissingBlockPolicy>,
    /// Declared view-models: block name -> fields
    pub blocks: BTreeMap<String, BTreeMap<String, String>>,
}

/// TOML structure for deserializing config files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    templates: Option<TomlTemplates>,
    compose: Option<TomlCompose>,
    #[serde(default)]
    blocks: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTemplates {
    directory: Option<PathBuf>,
    extension: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCompose {
    missing_block: Option<MissingBlockPolicy>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    ///
    /// A relative template directory is taken relative to the file itself.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let (Some(dir), Some(parent)) = (&config.template_dir, path.parent()) {
            if dir.is_relative() {
                config.template_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;

        Ok(ConfigFile {
            template_dir: parsed.templates.as_ref().and_then(|t| t.directory.clone()),
            template_extension: parsed.templates.as_ref().and_then(|t| t.extension.clone()),
            missing_block: parsed.compose.and_then(|c| c.missing_block),
            blocks: parsed.blocks,
        })
    }

    /// Apply the file's settings on top of `base`
    pub fn apply(&self, mut base: RenderConfig) -> RenderConfig {
        if let Some(dir) = &self.template_dir {
            base = base.with_template_dir(dir.clone());
        }
        if let Some(ext) = &self.template_extension {
            base = base.with_template_extension(ext.clone());
        }
        if let Some(policy) = self.missing_block {
            base = base.with_missing_block(policy);
        }
        base
    }

    /// Render configuration described by this file
    pub fn render_config(&self) -> RenderConfig {
        self.apply(RenderConfig::default())
    }

    /// View-models declared under `[blocks]`, sorted by name
    pub fn view_models(&self) -> Vec<Arc<dyn ViewModel>> {
        self.blocks
            .iter()
            .map(|(name, fields)| StaticViewModel::with_fields(name.clone(), fields.clone()).shared())
            .collect()
    }
}
