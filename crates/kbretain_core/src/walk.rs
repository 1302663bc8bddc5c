//! Lazy directory tree walk.
//!
//! [`DirWalk`] visits every directory below a root, depth-first, and yields
//! one [`WalkEvent::Directory`] per directory followed by one
//! [`WalkEvent::File`] per regular file directly inside it. File names and
//! subdirectories are sorted so the walk order never depends on the order
//! the filesystem lists entries in.
//!
//! The root is read but not yielded. A directory that cannot be read
//! yields a [`WalkError`] and the walk moves on.

use crate::error::WalkError;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An item produced by [`DirWalk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// Entered a directory below the root.
    Directory(PathBuf),
    /// A regular file directly inside `dir`.
    File {
        /// The containing directory.
        dir: PathBuf,
        /// The file name (UTF-8 names only).
        name: String,
    },
}

/// Depth-first walk over a directory tree.
///
/// The iterator is finite and consumed once; create a new walk to rescan.
#[derive(Debug)]
pub struct DirWalk {
    root: Option<PathBuf>,
    /// Directories still to visit, next one on top.
    stack: Vec<PathBuf>,
    queue: VecDeque<WalkEvent>,
}

impl DirWalk {
    /// Starts a walk rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            stack: Vec::new(),
            queue: VecDeque::new(),
        }
    }
}

impl Iterator for DirWalk {
    type Item = Result<WalkEvent, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(Ok(event));
            }

            let (dir, is_root) = match self.root.take() {
                Some(root) => (root, true),
                None => (self.stack.pop()?, false),
            };

            let listing = match read_listing(&dir) {
                Ok(listing) => listing,
                Err(source) => return Some(Err(WalkError { dir, source })),
            };

            self.stack.extend(listing.subdirs.into_iter().rev());

            if !is_root {
                self.queue.push_back(WalkEvent::Directory(dir.clone()));
                self.queue.extend(listing.files.into_iter().map(|name| WalkEvent::File {
                    dir: dir.clone(),
                    name,
                }));
            }
        }
    }
}

struct Listing {
    files: Vec<String>,
    subdirs: Vec<PathBuf>,
}

fn read_listing(dir: &Path) -> io::Result<Listing> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            subdirs.push(entry.path());
            continue;
        }

        // Only regular files and symlinks resolving to one are listed.
        // Dangling links, directory links and special files are skipped.
        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
        } else {
            file_type.is_file()
        };

        if is_file {
            if let Ok(name) = entry.file_name().into_string() {
                files.push(name);
            }
        }
    }

    files.sort();
    subdirs.sort();
    Ok(Listing { files, subdirs })
}
