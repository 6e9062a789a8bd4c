//! Single-instance lock backed by a pid file in the config directory.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

pub const PID_FILE: &str = "jiggler.pid";

#[derive(Debug)]
pub enum LockError {
    /// Another live process holds the lock.
    Held { pid: u32, path: PathBuf },
    Io(io::Error),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Held { pid, path } => write!(
                f,
                "another jiggler is already running (pid {pid}, lock {})",
                path.display()
            ),
            LockError::Io(err) => write!(f, "cannot write pid file: {err}"),
        }
    }
}

impl std::error::Error for LockError {}

impl From<io::Error> for LockError {
    fn from(err: io::Error) -> Self {
        LockError::Io(err)
    }
}

/// Held for the lifetime of `run`; removes the pid file on drop.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Takes the lock, replacing a pid file left behind by a dead process.
    ///
    /// The pid file is only ever created with `create_new`, so of two
    /// instances starting together exactly one wins.
    ///
    /// # Errors
    /// Returns [`LockError::Held`] when the recorded process is still alive.
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        let path = dir.join(PID_FILE);
        fs::create_dir_all(dir)?;
        let pid = std::process::id();

        // Second attempt only after a stale file was removed.
        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(pid.to_string().as_bytes())?;
                    file.sync_all()?;
                    info!(pid, path = %path.display(), "instance lock acquired");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    let recorded = fs::read_to_string(&path)
                        .ok()
                        .and_then(|content| content.trim().parse::<u32>().ok());
                    if let Some(existing) = recorded {
                        if is_process_running(existing) {
                            warn!(existing_pid = existing, "instance lock held");
                            return Err(LockError::Held { pid: existing, path });
                        }
                    }
                    warn!(stale_pid = ?recorded, "replacing stale pid file");
                    match fs::remove_file(&path) {
                        Ok(()) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LockError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "pid file was recreated while replacing it",
        )))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "instance lock released"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %self.path.display(), "failed to remove pid file"),
        }
    }
}

#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    // Signal 0 only checks existence and permission.
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_process_running(pid: u32) -> bool {
    warn!(pid, "process check unsupported on this platform");
    false
}
