// WHY: writing is the one blocking side effect; failures come back as io errors
// carrying the OS description instead of aborting the caller

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::fd::{AsFd, BorrowedFd};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use tracing::{debug, warn};

/// Permission bits used when a file is created without an explicit mode
pub const DEFAULT_MODE: u32 = 0o644;

/// Where [`crate::TextBuffer::save_to_file`] writes
#[derive(Debug, Clone, Copy)]
pub enum SaveTarget<'f> {
    /// Create `path` exclusively (fails if it exists) with permission `mode`
    Path { path: &'f Path, mode: u32 },
    /// Write to an already open descriptor, which stays open afterwards
    #[cfg(unix)]
    Fd(BorrowedFd<'f>),
    /// Process standard output, which stays open afterwards
    Stdout,
}

impl<'f> SaveTarget<'f> {
    pub fn path(path: &'f Path) -> Self {
        SaveTarget::Path { path, mode: DEFAULT_MODE }
    }

    pub fn path_with_mode(path: &'f Path, mode: u32) -> Self {
        SaveTarget::Path { path, mode }
    }
}

impl Default for SaveTarget<'_> {
    fn default() -> Self {
        SaveTarget::Stdout
    }
}

pub(crate) fn save_bytes(bytes: &[u8], target: SaveTarget<'_>) -> io::Result<()> {
    let result = match target {
        SaveTarget::Path { path, mode } => {
            // the file is closed when `file` drops, on success and failure alike
            let mut file = open_exclusive(path, mode)?;
            write_once(&mut file, bytes)
        }
        #[cfg(unix)]
        SaveTarget::Fd(fd) => write_through_dup(fd, bytes),
        #[cfg(unix)]
        SaveTarget::Stdout => {
            // WHY: std's stdout is line buffered and would split an unterminated tail
            // into a second write; anything already queued goes out first
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.flush().and_then(|()| write_through_dup(lock.as_fd(), bytes))
        }
        #[cfg(not(unix))]
        SaveTarget::Stdout => {
            let mut out = io::stdout().lock();
            write_once(&mut out, bytes).and_then(|()| out.flush())
        }
    };

    match &result {
        Ok(()) => debug!(?target, bytes = bytes.len(), "Saved text"),
        Err(e) => warn!(?target, error = %e, "Failed to save text"),
    }
    result
}

/// Writing through a duplicate leaves the caller's descriptor open
#[cfg(unix)]
fn write_through_dup(fd: BorrowedFd<'_>, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::from(fd.try_clone_to_owned()?);
    write_once(&mut file, bytes)
}

fn open_exclusive(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path)
}

/// Exactly one `write` call; anything short of the full length is an error
fn write_once<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    let written = writer.write(bytes)?;
    if written < bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {written} of {} bytes", bytes.len()),
        ));
    }
    Ok(())
}
