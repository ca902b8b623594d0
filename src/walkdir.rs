//! Depth-first listing of a directory tree, as a stream of entries.
//!
//! Adapted from Shepmaster's answer on [StackOverflow:56717139][0].
//!
//! [0]: https://stackoverflow.com/a/58825638

use futures::{stream, Stream, StreamExt};
use std::{io, path::PathBuf, sync::Arc};
use tokio::fs::{self, DirEntry};

/// Streams every entry below `root`, directories included (so that empty
/// directories can be reproduced). Symbolic links are yielded as entries of
/// their own, and not descended into.
///
/// Entries directly inside `root` are first passed through `keep_top_level`;
/// rejected entries are neither yielded nor descended into. Deeper entries
/// are always kept.
pub fn visit<F>(
    root: impl Into<PathBuf>,
    keep_top_level: F,
) -> impl Stream<Item = io::Result<DirEntry>> + Send + 'static
where
    F: Fn(&DirEntry) -> bool + Send + Sync + 'static,
{
    async fn one_level(
        path: PathBuf,
        root: &PathBuf,
        keep_top_level: &(dyn Fn(&DirEntry) -> bool + Send + Sync),
        to_visit: &mut Vec<PathBuf>,
    ) -> io::Result<Vec<DirEntry>> {
        let mut dir = fs::read_dir(&path).await?;
        let mut entries = Vec::new();

        while let Some(child) = dir.next_entry().await? {
            if path == *root && !keep_top_level(&child) {
                continue;
            }
            // Symlinks are yielded but never followed.
            if child.file_type().await?.is_dir() {
                to_visit.push(child.path());
            }
            entries.push(child);
        }
        // Reversed so that `pop` walks in listing order.
        to_visit.reverse();

        Ok(entries)
    }

    let root = Arc::new(root.into());
    let keep_top_level = Arc::new(keep_top_level);

    stream::unfold(vec![PathBuf::clone(&root)], move |mut to_visit| {
        let root = root.clone();
        let keep_top_level = keep_top_level.clone();
        async move {
            let path = to_visit.pop()?;
            let mut children = Vec::new();
            let entries = match one_level(path, &root, &*keep_top_level, &mut children).await {
                Ok(entries) => stream::iter(entries).map(Ok).left_stream(),
                Err(e) => stream::once(async move { Err(e) }).right_stream(),
            };
            to_visit.extend(children);

            Some((entries, to_visit))
        }
    })
    .flatten()
}
