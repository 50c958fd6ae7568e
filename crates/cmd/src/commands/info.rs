use anyhow::Result;
use drive::DriveContext;

use crate::common::{format_properties, open_navigated};

/// Show the remote properties of `name` in the current directory
pub async fn info_command<F>(context: &DriveContext, name: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let mut drive = open_navigated(context).await?;
    let props = drive.properties(name).await?;
    for line in format_properties(&props) {
        handler(&line);
    }
    Ok(())
}
