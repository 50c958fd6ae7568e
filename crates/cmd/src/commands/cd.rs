use anyhow::{Result, bail};
use diagnostics::log_debug;
use drive::DriveContext;

use crate::common::open_navigated;

/// Move into `name` (a child, or `../` to climb) and print the new location
pub async fn cd_command<F>(context: &DriveContext, name: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    if name.is_empty() {
        bail!("cd needs a directory name");
    }
    log_debug!("cd_command called with {name}", name: name);

    let mut drive = open_navigated(context).await?;
    let _ = drive.list(name, true).await?;
    handler(&drive.current_dir()?);
    Ok(())
}
