// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use diagnostics::log_info;
use drive::{Config, StorageConfig};

use crate::common::config_path_with_override;
use crate::error_utils::ErrorContext;

/// Settings to change; all `None` just shows the configuration
#[derive(Debug, Default, Clone)]
pub struct ConfigUpdate {
    pub data_path: Option<PathBuf>,
    pub sessions: Option<bool>,
    pub hostdir: Option<PathBuf>,
    pub memory: bool,
}

impl ConfigUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_path.is_none() && self.sessions.is_none() && self.hostdir.is_none() && !self.memory
    }

    fn apply(self, config: &mut Config) {
        if let Some(data_path) = self.data_path {
            config.data_path = data_path;
        }
        if let Some(sessions) = self.sessions {
            config.session = sessions;
        }
        if let Some(root) = self.hostdir {
            config.storage = StorageConfig::HostDir { root };
        } else if self.memory {
            config.storage = StorageConfig::Memory;
        }
    }
}

/// Show the configuration, saving it first when `update` changes anything
pub fn config_command<F>(config: Option<PathBuf>, update: ConfigUpdate, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let path = config_path_with_override(config);
    let path_str = path.display().to_string();
    let mut current = Config::load(&path).file_context("load config", &path_str)?;

    if !update.is_empty() {
        update.apply(&mut current);
        current.save(&path).file_context("save config", &path_str)?;
        log_info!("Saved configuration to {path}", path: path_str.as_str());
    }

    handler(&format!("# {path_str}"));
    let text = current.to_yaml_string().file_context("render config", &path_str)?;
    for line in text.lines() {
        handler(line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_show_defaults_without_writing() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("cloudnav.yml");
        let mut lines = Vec::new();
        config_command(Some(path.clone()), ConfigUpdate::default(), |line| {
            lines.push(line.to_string())
        })
        .unwrap();

        assert!(lines.iter().any(|l| l.contains("kind: hostdir")));
        assert!(!path.exists());
    }

    #[test]
    fn test_update_is_saved() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("conf").join("cloudnav.yml");
        let update = ConfigUpdate {
            sessions: Some(true),
            memory: true,
            ..ConfigUpdate::default()
        };
        config_command(Some(path.clone()), update, |_| {}).unwrap();

        let saved = Config::load(&path).unwrap();
        assert!(saved.session);
        assert_eq!(saved.storage, StorageConfig::Memory);
        assert_eq!(saved.data_path, PathBuf::from("./data"));
    }
}
