//! Recursive directory size accumulation.
//!
//! Sums the lengths of regular files under a root, hidden entries included.
//! Symbolic links are never followed and never counted: neither the link inode
//! nor its target contributes, which also rules out cycles. Directories add
//! nothing of their own. Every call is a fresh walk; nothing is cached.

#![allow(missing_docs)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::config::UnreadablePolicy;
use crate::core::errors::{Result, WatchdogError};
use crate::logger::console;

/// Sequential size scanner for one directory tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorySizeScanner {
    on_unreadable: UnreadablePolicy,
}

impl DirectorySizeScanner {
    pub fn new(on_unreadable: UnreadablePolicy) -> Self {
        Self { on_unreadable }
    }

    /// Total bytes of regular files under `root`.
    ///
    /// The root itself must be a readable directory regardless of policy.
    /// Below the root, read failures abort or skip per [`UnreadablePolicy`];
    /// entries that disappear mid-walk are ignored.
    pub fn scan(&self, root: &Path) -> Result<u64> {
        let root_meta = fs::metadata(root).map_err(|err| WatchdogError::scan(root, err))?;
        if !root_meta.is_dir() {
            return Err(WatchdogError::scan(
                root,
                std::io::Error::new(ErrorKind::NotADirectory, "not a directory"),
            ));
        }

        let mut total: u64 = 0;
        // Explicit work stack: deep trees must not exhaust the call stack.
        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) if dir.as_path() == root => return Err(WatchdogError::scan(&dir, err)),
                Err(err) => {
                    self.unreadable(&dir, err)?;
                    continue;
                }
            };

            for entry_result in entries {
                let entry = match entry_result {
                    Ok(entry) => entry,
                    Err(err) => {
                        self.unreadable(&dir, err)?;
                        continue;
                    }
                };

                // DirEntry::file_type does not traverse symlinks.
                let file_type = match entry.file_type() {
                    Ok(ft) => ft,
                    Err(err) => {
                        self.unreadable(&entry.path(), err)?;
                        continue;
                    }
                };

                if file_type.is_symlink() {
                    continue;
                }
                if file_type.is_dir() {
                    pending.push(entry.path());
                    continue;
                }
                if !file_type.is_file() {
                    continue;
                }

                match entry.metadata() {
                    Ok(meta) => total = total.saturating_add(meta.len()),
                    Err(err) => self.unreadable(&entry.path(), err)?,
                }
            }
        }

        Ok(total)
    }

    /// Apply the unreadable-subtree policy to one failure.
    fn unreadable(&self, path: &Path, err: std::io::Error) -> Result<()> {
        if err.kind() == ErrorKind::NotFound {
            return Ok(());
        }
        match self.on_unreadable {
            UnreadablePolicy::Abort => Err(WatchdogError::scan(path, err)),
            UnreadablePolicy::Skip => {
                console::warn(&format!(
                    "[CWD-2001] skipping unreadable {}: {err}",
                    path.display()
                ));
                Ok(())
            }
        }
    }
}
