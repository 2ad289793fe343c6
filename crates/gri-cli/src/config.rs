// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use gri_app::{QuestionnaireSeed, SectionKind, SourceCategory, SourceSeed};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "gri";
const CONFIG_PATH_ENV: &str = "GRI_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub seed: Seed,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            seed: Seed::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub start_section: Option<String>,
}

/// Rows the page starts with. An absent list falls back to the built-in
/// seed; an empty list starts that collection empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    pub activities: Option<Vec<String>>,
    pub sources: Option<Vec<SeedSource>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSource {
    pub name: String,
    pub category: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [ui] and [seed]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `gri --print-example-config` for a template",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(slug) = &self.ui.start_section
            && SectionKind::parse(slug).is_none()
        {
            let known = SectionKind::ALL
                .iter()
                .map(|section| section.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "ui.start_section in {} is {slug:?}; expected one of: {known}",
                path.display()
            );
        }

        for (index, source) in self.seed.sources.iter().flatten().enumerate() {
            if let Some(category) = &source.category
                && !category.trim().is_empty()
                && SourceCategory::parse(category).is_none()
            {
                bail!(
                    "seed.sources[{index}] ({:?}) in {} has category {category:?}; use \"renewable\" or \"non-renewable\"",
                    source.name,
                    path.display()
                );
            }
        }

        Ok(())
    }

    pub fn start_section(&self) -> SectionKind {
        self.ui
            .start_section
            .as_deref()
            .and_then(SectionKind::parse)
            .unwrap_or(SectionKind::Consumption)
    }

    pub fn seed(&self) -> QuestionnaireSeed {
        let defaults = QuestionnaireSeed::default();
        QuestionnaireSeed {
            activities: self
                .seed
                .activities
                .clone()
                .unwrap_or(defaults.activities),
            sources: match &self.seed.sources {
                Some(sources) => sources
                    .iter()
                    .map(|source| SourceSeed {
                        name: source.name.clone(),
                        category: source.category.as_deref().and_then(SourceCategory::parse),
                    })
                    .collect(),
                None => defaults.sources,
            },
        }
    }

    pub fn example_config(path: &Path) -> String {
        let seed = QuestionnaireSeed::default();
        let activities = seed
            .activities
            .iter()
            .map(|name| format!("{name:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sources = seed
            .sources
            .iter()
            .map(|source| {
                format!(
                    "  {{ name = {:?}, category = {:?} }},\n",
                    source.name,
                    source.category.map_or("", SourceCategory::as_str)
                )
            })
            .collect::<String>();
        format!(
            "# gri config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# One of: consumption, outside, intensity, reductions, instruments, factors\nstart_section = \"consumption\"\n\n[seed]\nactivities = [{activities}]\nsources = [\n{sources}]\n",
            path.display(),
        )
    }
}
