use anyhow::Result;
use drive::DriveContext;

use crate::common::open_navigated;

pub async fn mkdir_command<F>(context: &DriveContext, name: &str, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let mut drive = open_navigated(context).await?;
    drive.mkdir(name).await?;
    handler(&format!("created {}/{name}", drive.current_dir()?));
    Ok(())
}
