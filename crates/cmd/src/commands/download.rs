use std::path::Path;

use anyhow::{Result, bail};
use drive::DriveContext;

use crate::common::open_navigated;
use crate::error_utils::ErrorContext;

/// Download the file `name` into `dest`, refusing to clobber a local file
/// unless `overwrite` is set.
pub async fn download_command<F>(
    context: &DriveContext,
    name: &str,
    dest: &Path,
    overwrite: bool,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let dest_str = dest.display().to_string();
    let metadata = tokio::fs::metadata(dest)
        .await
        .file_context("read destination", &dest_str)?;
    if !metadata.is_dir() {
        bail!("Destination {dest_str} is not a directory");
    }
    let target = dest.join(name);
    let target_str = target.display().to_string();
    let exists = tokio::fs::try_exists(&target)
        .await
        .file_context("check", &target_str)?;
    if !overwrite && exists {
        bail!("{target_str} already exists; use --overwrite to replace it");
    }

    let mut drive = open_navigated(context).await?;
    let written = drive.download(name, dest).await?;
    handler(&format!("downloaded {name} to {}", written.display()));
    Ok(())
}
