use anyhow::Result;
use drive::DriveContext;

/// Forget all navigation state. Works even when the state file is corrupt.
pub fn reset_command<F>(context: &DriveContext, mut handler: F) -> Result<()>
where
    F: FnMut(&str),
{
    let mut drive = context.open_drive()?;
    drive.reset()?;
    handler(&format!("navigation state cleared ({})", context.list_file().display()));
    Ok(())
}
