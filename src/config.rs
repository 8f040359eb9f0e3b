// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::Identity;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Burnrate", "burnrate"));

/// The session issued at login, persisted so subsequent commands can talk
/// to the backend without re-authenticating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl StoredSession {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.user_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    #[serde(default)]
    pub session: Option<StoredSession>,
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    let config_dir = proj.config_dir();
    fs::create_dir_all(config_dir).context("Failed to create config dir")?;
    Ok(config_dir.join("config.json"))
}

pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).with_context(|| {
        format!(
            "No config at {}; run `burnrate init` first",
            path.display()
        )
    })?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config at {}", path.display()))
}

pub fn save(config: &Config) -> Result<()> {
    save_to(&config_path()?, config)
}

pub fn save_to(path: &Path, config: &Config) -> Result<()> {
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw).with_context(|| format!("Write config to {}", path.display()))?;
    Ok(())
}
