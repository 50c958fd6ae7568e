use std::path::Path;

use anyhow::Result;
use drive::DriveContext;

use crate::common::open_navigated;

/// Upload a local file into the current directory. An existing remote file
/// of the same name is only replaced with `overwrite`.
pub async fn upload_command<F>(
    context: &DriveContext,
    local: &Path,
    overwrite: bool,
    mut handler: F,
) -> Result<()>
where
    F: FnMut(&str),
{
    let mut drive = open_navigated(context).await?;
    let name = drive.upload(local, overwrite).await?;
    handler(&format!("uploaded {name} to {}", drive.current_dir()?));
    Ok(())
}
