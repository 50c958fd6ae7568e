use std::env;
use std::path::PathBuf;

use anyhow::Result;
use diagnostics::log_debug;
use drive::{CONFIG_ENV, Config, DEFAULT_CONFIG_FILE, Drive, DriveContext, Properties};
use navcache::{Child, Children};

use crate::error_utils::ErrorContext;

/// Config file location: explicit flag, then `CLOUDNAV_CONFIG`, then `./cloudnav.yml`
#[must_use]
pub fn config_path_with_override(override_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path {
        return path;
    }
    match env::var(CONFIG_ENV) {
        Ok(val) if !val.is_empty() => PathBuf::from(val),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Build the context every command runs against
pub fn load_context(config: Option<PathBuf>, session: Option<String>) -> Result<DriveContext> {
    let path = config_path_with_override(config);
    log_debug!("Loading configuration from {path}", path: path.display().to_string());
    let config = Config::load(&path).file_context("load config", &path.display().to_string())?;
    Ok(DriveContext::new(config, session))
}

/// Open the drive, recording a root listing first if nothing has been navigated yet
pub async fn open_navigated(context: &DriveContext) -> Result<Drive> {
    let mut drive = context.open_drive()?;
    if drive.cache().depth()? == 0 {
        log_debug!("No navigation state yet, starting at the root");
        let _ = drive.bootstrap().await?;
    }
    Ok(drive)
}

/// One listing line: `[file     ] name` or `[directory] name`
#[must_use]
pub fn format_entry(name: &str, child: &Child) -> String {
    format!("[{:<9}] {}", child.kind.as_str(), name)
}

#[must_use]
pub fn format_listing(listing: &Children) -> Vec<String> {
    listing
        .iter()
        .map(|(name, child)| format_entry(name, child))
        .collect()
}

#[must_use]
pub fn format_properties(props: &Properties) -> Vec<String> {
    props
        .entries
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect()
}
