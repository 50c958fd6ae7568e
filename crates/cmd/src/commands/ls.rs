use anyhow::Result;
use diagnostics::log_debug;
use drive::DriveContext;

use crate::common::{format_listing, open_navigated};

/// List the current directory, or the directory `name` without moving into it
pub async fn ls_command<F>(context: &DriveContext, name: Option<&str>, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let name = name.unwrap_or_default();
    log_debug!("ls_command called with {name}", name: name);

    let mut drive = open_navigated(context).await?;
    let listing = drive.list(name, false).await?;
    for line in format_listing(&listing) {
        handler(&line);
    }
    Ok(())
}
