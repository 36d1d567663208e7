/*
 * Copyright 2026 The cheekyfs authors
 *
 * This file is part of cheekyfs.
 *
 * cheekyfs is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * cheekyfs is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * cheekyfs. If not, see <https://www.gnu.org/licenses/>.
 */

//! The open-file table: maps descriptors to files and tracks the `readdir`
//! iteration cursor.

use crate::error::{Error, Result};
use crate::{FileId, MAX_OPEN_FILES};

/// One slot of the open-file table.
#[derive(Debug, Clone, Copy, Default)]
struct OpenEntry {
    /// The file this descriptor refers to, or `None` if the slot is free.
    file: Option<FileId>,
    /// For a directory, the last child `readdir` returned. `None` means
    /// "iteration hasn't started" (or has been reset — see
    /// [`OpenTable::invalidate_cursors_into`]).
    cursor: Option<FileId>,
}

/// The fixed-size table of currently-open descriptors.
#[derive(Debug, Clone)]
pub struct OpenTable {
    entries: [OpenEntry; MAX_OPEN_FILES],
}

impl OpenTable {
    pub fn new() -> Self {
        Self {
            entries: [OpenEntry::default(); MAX_OPEN_FILES],
        }
    }

    /// Occupies the first free slot with `file`, returning its descriptor.
    pub fn open(&mut self, file: FileId) -> Result<usize> {
        let fd = self
            .entries
            .iter()
            .position(|entry| entry.file.is_none())
            .ok_or(Error::TooManyOpen)?;
        self.entries[fd] = OpenEntry {
            file: Some(file),
            cursor: None,
        };
        Ok(fd)
    }

    /// Clears descriptor `fd`. Errors if it is out of range or not open.
    pub fn close(&mut self, fd: usize) -> Result<()> {
        let entry = self.entries.get_mut(fd).ok_or(Error::BadFd)?;
        if entry.file.is_none() {
            return Err(Error::BadFd);
        }
        *entry = OpenEntry::default();
        Ok(())
    }

    /// The file descriptor `fd` refers to.
    pub fn file_of(&self, fd: usize) -> Result<FileId> {
        self.entries
            .get(fd)
            .and_then(|entry| entry.file)
            .ok_or(Error::BadFd)
    }

    /// Whether `fd` is currently open at all.
    pub fn is_valid(&self, fd: usize) -> bool {
        self.entries.get(fd).is_some_and(|entry| entry.file.is_some())
    }

    /// Whether any descriptor currently refers to `file`.
    pub fn is_open(&self, file: FileId) -> bool {
        self.entries.iter().any(|entry| entry.file == Some(file))
    }

    /// The readdir cursor for `fd` (the last child returned), if any.
    pub fn cursor(&self, fd: usize) -> Result<Option<FileId>> {
        self.entries
            .get(fd)
            .filter(|entry| entry.file.is_some())
            .map(|entry| entry.cursor)
            .ok_or(Error::BadFd)
    }

    /// Advances the readdir cursor for `fd`.
    pub fn set_cursor(&mut self, fd: usize, cursor: Option<FileId>) {
        if let Some(entry) = self.entries.get_mut(fd) {
            entry.cursor = cursor;
        }
    }

    /// Resets every open cursor that points into directory `dir` back to
    /// "not started".
    ///
    /// The reference implementation's cursor is a raw pointer into the
    /// child list and dangles if the list mutates underneath it; this is the
    /// design notes' recommended fix, applied on every `add`/`remove` rather
    /// than relying on callers to notice.
    pub fn invalidate_cursors_into(&mut self, dir: FileId) {
        for entry in self.entries.iter_mut() {
            if entry.file == Some(dir) {
                entry.cursor = None;
            }
        }
    }
}

impl Default for OpenTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_close_roundtrip() {
        let mut table = OpenTable::new();
        let fd = table.open(5).unwrap();
        assert_eq!(table.file_of(fd).unwrap(), 5);
        table.close(fd).unwrap();
        assert_eq!(table.file_of(fd), Err(Error::BadFd));
    }

    #[test]
    fn double_close_is_bad_fd() {
        let mut table = OpenTable::new();
        let fd = table.open(1).unwrap();
        table.close(fd).unwrap();
        assert_eq!(table.close(fd), Err(Error::BadFd));
    }

    #[test]
    fn same_file_opened_twice_yields_distinct_descriptors() {
        let mut table = OpenTable::new();
        let fd1 = table.open(3).unwrap();
        let fd2 = table.open(3).unwrap();
        assert_ne!(fd1, fd2);
        assert_eq!(table.file_of(fd1).unwrap(), table.file_of(fd2).unwrap());
    }

    #[test]
    fn too_many_open_once_table_is_full() {
        let mut table = OpenTable::new();
        for _ in 0..MAX_OPEN_FILES {
            table.open(0).unwrap();
        }
        assert_eq!(table.open(0), Err(Error::TooManyOpen));
    }

    #[test]
    fn cursor_invalidation_resets_matching_entries_only() {
        let mut table = OpenTable::new();
        let fd_dir = table.open(0).unwrap();
        let fd_other = table.open(1).unwrap();
        table.set_cursor(fd_dir, Some(7));
        table.set_cursor(fd_other, Some(9));

        table.invalidate_cursors_into(0);

        assert_eq!(table.cursor(fd_dir).unwrap(), None);
        assert_eq!(table.cursor(fd_other).unwrap(), Some(9));
    }
}
