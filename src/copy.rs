use futures::{Stream, StreamExt};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use termion::terminal_size;
use thiserror::Error;
use tokio::fs::DirEntry;
use tracing::debug;

const SPINNER_CHARS: &[&str] = &[
    "⠉", "⠋", "⠍", "⠎", "⡅", "⡇", "⡆", "⣄", "⣠", "⣈", "⣘", "⢱",
];

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Could not list the template files: {0}")]
    Walk(#[source] io::Error),
    #[error("Could not copy '{}' to '{}': {}", .from.display(), .to.display(), .source)]
    Copy {
        #[source]
        source: io::Error,
        from: PathBuf,
        to: PathBuf,
    },
}

/// One-line progress indicator, showing the file currently being copied.
/// Stays silent when stdout is not a terminal.
struct Progress {
    tick: usize,
    width: Option<usize>,
}

impl Progress {
    fn new() -> Self {
        let width = if termion::is_tty(&io::stdout()) {
            terminal_size().ok().map(|(w, _)| w as usize)
        } else {
            None
        };
        Progress { tick: 0, width }
    }

    fn show(&mut self, file: &Path) {
        let width = match self.width {
            Some(width) if width > 10 => width,
            _ => return,
        };
        self.tick = (self.tick + 1) % SPINNER_CHARS.len();
        let symbol = SPINNER_CHARS[self.tick];

        let file_name = file.to_string_lossy();
        let file_name: String = {
            let keep = width.saturating_sub(10);
            let skip = file_name.chars().count().saturating_sub(keep);
            file_name.chars().skip(skip).collect()
        };
        let padding = " ".repeat(width.saturating_sub(file_name.chars().count() + 4));
        print!("{} {}{} {}\r", symbol, file_name, padding, symbol);
        io::stdout().flush().ok();
    }

    fn clear(&self) {
        if let Some(width) = self.width {
            print!("{}\r", " ".repeat(width));
            io::stdout().flush().ok();
        }
    }
}

/// Copies a single entry. Symbolic links are recreated as links (pointing
/// at the same target, which need not exist) rather than followed.
async fn copy_from_to(from: &Path, to: &Path) -> io::Result<()> {
    let file_type = tokio::fs::symlink_metadata(from).await?.file_type();
    if file_type.is_dir() {
        if !to.exists() {
            tokio::fs::create_dir_all(to).await?;
        }
        return Ok(());
    }

    if let Some(parent) = to.parent() {
        if !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    if file_type.is_symlink() {
        copy_symlink(from, to).await
    } else {
        tokio::fs::copy(from, to).await.map(|_| ())
    }
}

#[cfg(unix)]
async fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = tokio::fs::read_link(from).await?;
    tokio::fs::symlink(target, to).await
}

#[cfg(not(unix))]
async fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    tokio::fs::copy(from, to).await.map(|_| ())
}

/// Copies the entries yielded by `entries` (all of them below
/// `from_base_dir`) to the same relative location below `to_base_dir`.
///
/// Entries are copied one at a time, in stream order. The first failure is
/// returned; whatever was copied up to that point is left in place.
/// Returns the number of copied entries.
pub async fn recursive_copy(
    from_base_dir: &Path,
    to_base_dir: &Path,
    mut entries: impl Stream<Item = io::Result<DirEntry>> + Unpin,
) -> Result<usize, CopyError> {
    let mut progress = Progress::new();
    let mut copied = 0;

    while let Some(entry) = entries.next().await {
        let from = entry.map_err(CopyError::Walk)?.path();
        let relative = match from.strip_prefix(from_base_dir) {
            Ok(relative) if relative != Path::new("") => relative,
            _ => continue,
        };
        let to = to_base_dir.join(relative);
        progress.show(relative);
        debug!(from = %from.display(), to = %to.display(), "copying");

        if let Err(source) = copy_from_to(&from, &to).await {
            progress.clear();
            return Err(CopyError::Copy { source, from, to });
        }
        copied += 1;
    }

    progress.clear();
    Ok(copied)
}
