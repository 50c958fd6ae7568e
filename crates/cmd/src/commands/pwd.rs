use anyhow::Result;
use drive::DriveContext;

use crate::common::open_navigated;

pub async fn pwd_command<F>(context: &DriveContext, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let mut drive = open_navigated(context).await?;
    handler(&drive.current_dir()?);
    Ok(())
}
