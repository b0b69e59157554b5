use std::path::Path;
use std::process::Command;

use tracing::debug;

/// Hands a produced document to an external application.
pub trait Viewer {
    fn open(&self, path: &Path) -> std::io::Result<()>;
}

/// The operating system's default handler for the file type.
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> std::io::Result<()> {
        let mut command = default_handler(path);
        debug!("Launching {:?}", command);
        command.spawn()?;
        Ok(())
    }
}

/// Leaves documents closed.
pub struct NoViewer;

impl Viewer for NoViewer {
    fn open(&self, _path: &Path) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(windows)]
fn default_handler(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(target_os = "macos")]
fn default_handler(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(all(unix, not(target_os = "macos")))]
fn default_handler(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
