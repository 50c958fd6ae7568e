use anyhow::{Result, bail};
use diagnostics::log_info;
use drive::DriveContext;

use crate::common::open_navigated;

/// Delete `name` from the current directory. Non-empty directories need `force`.
pub async fn rm_command<F>(context: &DriveContext, name: &str, force: bool, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let mut drive = open_navigated(context).await?;
    if !force && drive.has_children(name).await? {
        bail!("'{name}' is a directory that is not empty; use --force to delete it");
    }
    drive.delete(name).await?;
    log_info!("rm {name} (force={force})", name: name, force: force);
    handler(&format!("removed {name}"));
    Ok(())
}
